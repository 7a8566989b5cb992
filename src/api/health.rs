// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Transit client configuration (the key name in use).
    pub transit: String,
    /// JWKS (authentication keys) status.
    /// Only present in production mode (KEYCLOAK_JWKS_URL configured).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks: Option<String>,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Check if JWKS is available (production auth mode).
async fn check_jwks(state: &AppState) -> Option<String> {
    if let Some(ref jwks) = state.auth.jwks {
        if jwks.is_cached().await {
            Some("ok".to_string())
        } else {
            Some("pending".to_string())
        }
    } else {
        None
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses((status = 200, body = ReadyResponse))
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let jwks = check_jwks(&state).await;

    let degraded = matches!(jwks.as_deref(), Some("pending"));
    let status = if degraded { "degraded" } else { "ok" };

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: status.to_string(),
            checks: HealthChecks {
                service: "ok".to_string(),
                transit: format!("key:{}", state.transit.key_name()),
                jwks,
            },
        }),
    )
}
