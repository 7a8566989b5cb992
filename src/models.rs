// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! # API Data Models
//!
//! Request and response structures for the rewards and orders resources.
//! All types derive `Serialize`, `Deserialize`, and `ToSchema` for JSON
//! handling and OpenAPI documentation.
//!
//! The persisted [`Reward`] carries only the ciphertext produced by the
//! transit service. The plaintext discount appears solely in transient
//! request/response types ([`CreateRewardRequest`], [`UpdateRewardRequest`],
//! [`DecryptedReward`]) and is never a field of the stored entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Reward Models
// =============================================================================

/// A persisted reward.
///
/// Invariant: a `Reward` exists only after its discount has been successfully
/// converted to ciphertext by the transit service. The ciphertext is opaque
/// (it embeds key-version metadata) and must never be interpreted or mutated
/// outside the transit client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Reward {
    /// Unique identifier for this reward.
    pub id: String,
    /// Display name, e.g. "Holiday Special".
    pub name: String,
    /// Transit-encrypted discount.
    pub ciphertext: String,
}

/// Request to create a reward with a plaintext discount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRewardRequest {
    /// Display name for the reward.
    pub name: String,
    /// Plaintext discount; encrypted before anything is persisted.
    pub discount: f64,
}

/// Request to update a reward, re-encrypting its discount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRewardRequest {
    /// Updated display name.
    pub name: String,
    /// New plaintext discount.
    pub discount: f64,
}

/// A reward with its discount decrypted on demand.
///
/// Transient view only; never written back to storage.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DecryptedReward {
    /// Identifier of the underlying reward.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Decrypted discount value.
    pub discount: f64,
}

/// Outcome of a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the reward was removed.
    pub success: bool,
    /// Human-readable detail.
    pub message: String,
}

// =============================================================================
// Order Models
// =============================================================================

/// An order attributed to the identity carried by the caller's token.
///
/// `username` and `email` are always derived from token claims, never from
/// request bodies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct OrderInfo {
    /// Unique identifier for this order.
    pub id: String,
    /// Display name from the token's `name` claim.
    pub username: String,
    /// Email from the token's `email` claim.
    pub email: String,
    /// Ordered product name.
    pub product_name: String,
    /// Product price at order time.
    pub product_price: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Request to place an order.
///
/// Deliberately carries no identity fields; attribution comes from the
/// propagated token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Name of the product being ordered.
    pub product_name: String,
    /// Price of the product.
    pub product_price: f64,
}
