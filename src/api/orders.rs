// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Order endpoints.
//!
//! Attribution comes exclusively from the token's claims — the request body
//! carries product data only, so a caller cannot spoof another user's
//! identity. The privileged all-users listing is gated on the realm-admin
//! role; non-privileged callers degrade to their own orders rather than
//! being rejected.

use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateOrderRequest, OrderInfo},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    tag = "Orders",
    responses((status = 201, body = OrderInfo))
)]
pub async fn create_order(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderInfo>), ApiError> {
    let mut store = state.store.write().await;
    let order = store.insert_order(
        user.display_name.clone(),
        user.attribution_email(),
        request.product_name,
        request.product_price,
    );
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    responses((status = 200, body = [OrderInfo]))
)]
pub async fn list_orders(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderInfo>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(
        store.orders_for(&user.display_name, &user.attribution_email()),
    ))
}

#[utoipa::path(
    get,
    path = "/orders_all",
    tag = "Orders",
    responses((status = 200, body = [OrderInfo], description = "All orders for realm-admins; the caller's own orders otherwise"))
)]
pub async fn list_all_orders(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderInfo>>, ApiError> {
    let store = state.store.read().await;
    if user.is_realm_admin() {
        Ok(Json(store.all_orders()))
    } else {
        // Reads degrade to self-scoped results instead of rejecting.
        debug!(user_id = %user.user_id, "caller lacks realm-admin; scoping to own orders");
        Ok(Json(
            store.orders_for(&user.display_name, &user.attribution_email()),
        ))
    }
}
