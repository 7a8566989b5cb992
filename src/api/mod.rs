// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CreateOrderRequest, CreateRewardRequest, DecryptedReward, DeleteOutcome, OrderInfo,
        Reward, UpdateRewardRequest,
    },
    state::AppState,
};

pub mod health;
pub mod orders;
pub mod rewards;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/rewards",
            get(rewards::list_rewards).post(rewards::create_reward),
        )
        .route(
            "/rewards/{reward_id}",
            get(rewards::get_reward)
                .put(rewards::update_reward)
                .delete(rewards::delete_reward),
        )
        .route("/rewards/{reward_id}/decrypt", get(rewards::decrypt_reward))
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/orders_all", get(orders::list_all_orders))
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        rewards::list_rewards,
        rewards::create_reward,
        rewards::get_reward,
        rewards::update_reward,
        rewards::delete_reward,
        rewards::decrypt_reward,
        orders::create_order,
        orders::list_orders,
        orders::list_all_orders,
        health::health,
        health::ready
    ),
    components(
        schemas(
            Reward,
            CreateRewardRequest,
            UpdateRewardRequest,
            DecryptedReward,
            DeleteOutcome,
            OrderInfo,
            CreateOrderRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Rewards", description = "Reward management with transit-encrypted discounts"),
        (name = "Orders", description = "Order placement and listing"),
        (name = "Health", description = "Liveness and readiness")
    )
)]
struct ApiDoc;
