// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use store_rewards_server::{
    api::router,
    config::{
        env_optional, KEYCLOAK_AUDIENCE_ENV, KEYCLOAK_ISSUER_ENV, KEYCLOAK_JWKS_URL_ENV,
    },
    lifecycle,
    models::CreateRewardRequest,
    state::{AppState, AuthConfig},
    store::InMemoryStore,
    transit::TransitClient,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

fn auth_config() -> AuthConfig {
    let jwks = env_optional(KEYCLOAK_JWKS_URL_ENV).map(store_rewards_server::auth::JwksManager::new);
    if jwks.is_none() {
        warn!("KEYCLOAK_JWKS_URL not set; tokens are decoded without signature verification");
    }

    AuthConfig {
        jwks,
        issuer: env_optional(KEYCLOAK_ISSUER_ENV),
        audience: env_optional(KEYCLOAK_AUDIENCE_ENV),
    }
}

/// Create one reward at startup when SEED_REWARD_NAME/SEED_REWARD_DISCOUNT
/// are set. A transit failure here logs a warning instead of aborting, so
/// the service can still come up while the transit engine is sealed.
async fn seed_reward(state: &AppState) {
    let (Some(name), Some(discount)) = (
        env_optional("SEED_REWARD_NAME"),
        env_optional("SEED_REWARD_DISCOUNT"),
    ) else {
        return;
    };

    let discount: f64 = match discount.parse() {
        Ok(d) => d,
        Err(_) => {
            warn!(value = %discount, "SEED_REWARD_DISCOUNT is not a number; skipping seed");
            return;
        }
    };

    match lifecycle::create_reward(
        &state.transit,
        &state.store,
        CreateRewardRequest { name, discount },
    )
    .await
    {
        Ok(reward) => info!(reward_id = %reward.id, "seeded initial reward"),
        Err(e) => warn!(error = %e.message, "failed to seed initial reward"),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let transit = TransitClient::from_env().expect("transit client configuration");
    info!(key = transit.key_name(), "transit client configured");

    let state = AppState::new(InMemoryStore::new(), transit).with_auth_config(auth_config());
    seed_reward(&state).await;

    let app = router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    info!("store rewards server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    info!("shutdown signal received");
}
