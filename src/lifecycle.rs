// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Reward lifecycle orchestration.
//!
//! Transitions: Draft(plaintext) → Encrypting → Stored(ciphertext);
//! Stored → Decrypting → Revealed (transient); Stored → Encrypting on
//! update; Stored → Deleted.
//!
//! The sensitive-field invariant lives here: a reward record is persisted if
//! and only if its discount has already been converted to ciphertext. A
//! transit failure aborts the transition and leaves the prior persisted
//! state (or no record, for create) unchanged. Revealed plaintext is never
//! written back, and every reveal round-trips to the transit service.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::ApiError;
use crate::models::{
    CreateRewardRequest, DecryptedReward, DeleteOutcome, Reward, UpdateRewardRequest,
};
use crate::store::InMemoryStore;
use crate::transit::{canonical_discount, TransitClient};

/// Draft → Encrypting → Stored.
///
/// Encryption happens before the store is touched; if the transit call
/// fails, no record is created.
pub async fn create_reward(
    transit: &TransitClient,
    store: &Arc<RwLock<InMemoryStore>>,
    request: CreateRewardRequest,
) -> Result<Reward, ApiError> {
    let plaintext = canonical_discount(request.discount);
    let ciphertext = transit.encrypt(&plaintext).await?;

    let reward = store
        .write()
        .await
        .insert_reward(request.name, ciphertext);

    info!(reward_id = %reward.id, name = %reward.name, "created reward");
    Ok(reward)
}

/// Stored → Decrypting → Revealed.
///
/// The decrypted view is computed on demand and returned transiently.
pub async fn reveal_reward(
    transit: &TransitClient,
    store: &Arc<RwLock<InMemoryStore>>,
    reward_id: &str,
) -> Result<DecryptedReward, ApiError> {
    let reward = store.read().await.reward(reward_id)?;

    let discount = transit.decrypt_discount(&reward.ciphertext).await?;
    Ok(DecryptedReward {
        id: reward.id,
        name: reward.name,
        discount,
    })
}

/// Stored → Encrypting → Stored with replaced ciphertext.
///
/// The new ciphertext is produced first; only then is the old one
/// discarded. A transit failure leaves the stored record untouched.
pub async fn update_reward(
    transit: &TransitClient,
    store: &Arc<RwLock<InMemoryStore>>,
    reward_id: &str,
    request: UpdateRewardRequest,
) -> Result<Reward, ApiError> {
    // Reject unknown ids before spending a transit round trip.
    store.read().await.reward(reward_id)?;

    let plaintext = canonical_discount(request.discount);
    let ciphertext = transit.encrypt(&plaintext).await?;

    let reward = store
        .write()
        .await
        .replace_reward(reward_id, request.name, ciphertext)?;

    info!(reward_id = %reward.id, "re-encrypted reward");
    Ok(reward)
}

/// Stored → Deleted.
pub async fn delete_reward(
    store: &Arc<RwLock<InMemoryStore>>,
    reward_id: &str,
) -> Result<DeleteOutcome, ApiError> {
    store.write().await.delete_reward(reward_id)?;
    info!(reward_id = %reward_id, "deleted reward");
    Ok(DeleteOutcome {
        success: true,
        message: "Reward deleted successfully.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit::tests::stub_client;
    use axum::http::StatusCode;

    fn locked_store() -> Arc<RwLock<InMemoryStore>> {
        Arc::new(RwLock::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn create_encrypts_then_stores() {
        let (transit, _stub) = stub_client().await;
        let store = locked_store();

        let reward = create_reward(
            &transit,
            &store,
            CreateRewardRequest {
                name: "Holiday".into(),
                discount: 15.0,
            },
        )
        .await
        .unwrap();

        assert_eq!(reward.name, "Holiday");
        assert!(reward.ciphertext.starts_with("vault:"));
        assert_eq!(store.read().await.reward_count(), 1);

        // The persisted ciphertext decrypts back to the canonical plaintext.
        assert_eq!(transit.decrypt(&reward.ciphertext).await.unwrap(), "15");
    }

    #[tokio::test]
    async fn create_failure_persists_nothing() {
        let (transit, stub) = stub_client().await;
        *stub.fail_encrypt.lock().unwrap() = true;
        let store = locked_store();

        let err = create_reward(
            &transit,
            &store,
            CreateRewardRequest {
                name: "Holiday".into(),
                discount: 15.0,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(store.read().await.reward_count(), 0);
    }

    #[tokio::test]
    async fn reveal_round_trips_plaintext() {
        let (transit, _stub) = stub_client().await;
        let store = locked_store();

        let reward = create_reward(
            &transit,
            &store,
            CreateRewardRequest {
                name: "Holiday".into(),
                discount: 12.5,
            },
        )
        .await
        .unwrap();

        let revealed = reveal_reward(&transit, &store, &reward.id).await.unwrap();
        assert_eq!(revealed.id, reward.id);
        assert_eq!(revealed.name, "Holiday");
        assert_eq!(revealed.discount, 12.5);
    }

    #[tokio::test]
    async fn reveal_unknown_id_is_not_found() {
        let (transit, _stub) = stub_client().await;
        let store = locked_store();

        let err = reveal_reward(&transit, &store, "missing").await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_replaces_ciphertext() {
        let (transit, _stub) = stub_client().await;
        let store = locked_store();

        let reward = create_reward(
            &transit,
            &store,
            CreateRewardRequest {
                name: "Holiday".into(),
                discount: 15.0,
            },
        )
        .await
        .unwrap();

        let updated = update_reward(
            &transit,
            &store,
            &reward.id,
            UpdateRewardRequest {
                name: "Winter".into(),
                discount: 20.0,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.id, reward.id);
        assert_ne!(updated.ciphertext, reward.ciphertext);
        assert_eq!(transit.decrypt(&updated.ciphertext).await.unwrap(), "20");
    }

    #[tokio::test]
    async fn update_failure_leaves_old_ciphertext() {
        let (transit, stub) = stub_client().await;
        let store = locked_store();

        let reward = create_reward(
            &transit,
            &store,
            CreateRewardRequest {
                name: "Holiday".into(),
                discount: 15.0,
            },
        )
        .await
        .unwrap();

        *stub.fail_encrypt.lock().unwrap() = true;
        let err = update_reward(
            &transit,
            &store,
            &reward.id,
            UpdateRewardRequest {
                name: "Winter".into(),
                discount: 20.0,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);

        let stored = store.read().await.reward(&reward.id).unwrap();
        assert_eq!(stored, reward);
    }

    #[tokio::test]
    async fn update_unknown_id_skips_transit() {
        let (transit, stub) = stub_client().await;
        // Encryption would fail loudly if it were attempted.
        *stub.fail_encrypt.lock().unwrap() = true;
        let store = locked_store();

        let err = update_reward(
            &transit,
            &store,
            "missing",
            UpdateRewardRequest {
                name: "Winter".into(),
                discount: 20.0,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn concurrent_creates_do_not_cross_assign_ciphertexts() {
        let (transit, _stub) = stub_client().await;
        let store = locked_store();

        let (first, second) = tokio::join!(
            create_reward(
                &transit,
                &store,
                CreateRewardRequest {
                    name: "First".into(),
                    discount: 11.0,
                },
            ),
            create_reward(
                &transit,
                &store,
                CreateRewardRequest {
                    name: "Second".into(),
                    discount: 22.0,
                },
            ),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert_eq!(transit.decrypt(&first.ciphertext).await.unwrap(), "11");
        assert_eq!(transit.decrypt(&second.ciphertext).await.unwrap(), "22");
    }

    #[tokio::test]
    async fn delete_reports_outcome() {
        let (transit, _stub) = stub_client().await;
        let store = locked_store();

        let reward = create_reward(
            &transit,
            &store,
            CreateRewardRequest {
                name: "Holiday".into(),
                discount: 15.0,
            },
        )
        .await
        .unwrap();

        let outcome = delete_reward(&store, &reward.id).await.unwrap();
        assert!(outcome.success);
        assert_eq!(store.read().await.reward_count(), 0);

        let err = delete_reward(&store, &reward.id).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
