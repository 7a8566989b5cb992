// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Reward endpoints.
//!
//! Listing and lookup expose the ciphertext form only; the plaintext
//! discount appears solely on the explicit decrypt endpoint, computed on
//! demand per request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    lifecycle,
    models::{CreateRewardRequest, DecryptedReward, DeleteOutcome, Reward, UpdateRewardRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/rewards",
    tag = "Rewards",
    responses((status = 200, body = [Reward]))
)]
pub async fn list_rewards(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reward>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.list_rewards()))
}

#[utoipa::path(
    post,
    path = "/rewards",
    request_body = CreateRewardRequest,
    tag = "Rewards",
    responses(
        (status = 201, body = Reward),
        (status = 502, description = "Transit encryption failed; nothing was stored")
    )
)]
pub async fn create_reward(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateRewardRequest>,
) -> Result<(StatusCode, Json<Reward>), ApiError> {
    let reward = lifecycle::create_reward(&state.transit, &state.store, request).await?;
    Ok((StatusCode::CREATED, Json(reward)))
}

#[utoipa::path(
    get,
    path = "/rewards/{reward_id}",
    params(("reward_id" = String, Path, description = "Identifier of the reward")),
    tag = "Rewards",
    responses((status = 200, body = Reward), (status = 404))
)]
pub async fn get_reward(
    Auth(_user): Auth,
    Path(reward_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Reward>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.reward(&reward_id)?))
}

#[utoipa::path(
    get,
    path = "/rewards/{reward_id}/decrypt",
    params(("reward_id" = String, Path, description = "Identifier of the reward")),
    tag = "Rewards",
    responses(
        (status = 200, body = DecryptedReward),
        (status = 404),
        (status = 422, description = "Decrypted payload did not parse as a discount")
    )
)]
pub async fn decrypt_reward(
    Auth(_user): Auth,
    Path(reward_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DecryptedReward>, ApiError> {
    let revealed = lifecycle::reveal_reward(&state.transit, &state.store, &reward_id).await?;
    Ok(Json(revealed))
}

#[utoipa::path(
    put,
    path = "/rewards/{reward_id}",
    params(("reward_id" = String, Path, description = "Identifier of the reward")),
    request_body = UpdateRewardRequest,
    tag = "Rewards",
    responses(
        (status = 200, body = Reward),
        (status = 404),
        (status = 502, description = "Re-encryption failed; the stored ciphertext is unchanged")
    )
)]
pub async fn update_reward(
    Auth(_user): Auth,
    Path(reward_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateRewardRequest>,
) -> Result<Json<Reward>, ApiError> {
    let reward =
        lifecycle::update_reward(&state.transit, &state.store, &reward_id, request).await?;
    Ok(Json(reward))
}

#[utoipa::path(
    delete,
    path = "/rewards/{reward_id}",
    params(("reward_id" = String, Path, description = "Identifier of the reward")),
    tag = "Rewards",
    responses((status = 200, body = DeleteOutcome), (status = 404))
)]
pub async fn delete_reward(
    Auth(_user): Auth,
    Path(reward_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let outcome = lifecycle::delete_reward(&state.store, &reward_id).await?;
    Ok(Json(outcome))
}
