// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! Keycloak publishes realm signing keys at
//! `{realm}/protocol/openid-connect/certs`. Keys are cached with a TTL so
//! token verification does not hit the realm endpoint on every request; if a
//! refresh fails while a stale set is held, the stale set is reused rather
//! than failing the request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::RwLock;
use tracing::warn;

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Caching fetcher for the realm's signing keys.
#[derive(Clone)]
pub struct JwksManager {
    jwks_url: String,
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    client: reqwest::Client,
}

impl JwksManager {
    /// `jwks_url` is the realm JWKS endpoint, e.g.
    /// `http://localhost:8080/realms/StoreRealm/protocol/openid-connect/certs`.
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    #[allow(dead_code)]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Decoding key for the token's `kid`.
    pub async fn get_decoding_key(&self, kid: &str) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwks = self.current_jwks().await?;
        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
            .ok_or(AuthError::NoMatchingKey)?;
        decoding_key_for(jwk)
    }

    /// First usable key, for tokens issued without a `kid` header.
    pub async fn get_any_decoding_key(&self) -> Result<(DecodingKey, Algorithm), AuthError> {
        let jwks = self.current_jwks().await?;
        jwks.keys
            .iter()
            .find_map(|jwk| decoding_key_for(jwk).ok())
            .ok_or(AuthError::NoMatchingKey)
    }

    /// Whether a fresh key set is currently held.
    pub async fn is_cached(&self) -> bool {
        match &*self.cache.read().await {
            Some(entry) => entry.is_fresh(self.cache_ttl),
            None => false,
        }
    }

    async fn current_jwks(&self) -> Result<JwkSet, AuthError> {
        if let Some(entry) = &*self.cache.read().await {
            if entry.is_fresh(self.cache_ttl) {
                return Ok(entry.jwks.clone());
            }
        }

        match self.fetch_jwks().await {
            Ok(jwks) => {
                *self.cache.write().await = Some(CacheEntry {
                    jwks: jwks.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(jwks)
            }
            Err(err) => {
                // Serve the stale set if one exists; availability over
                // freshness for key rotation.
                if let Some(entry) = &*self.cache.read().await {
                    warn!(error = %err, "JWKS refresh failed, using stale key set");
                    return Ok(entry.jwks.clone());
                }
                Err(err)
            }
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetchError(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))
    }
}

/// Build a decoding key from a JWK; Keycloak realms sign with RSA by
/// default, EC when configured.
fn decoding_key_for(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                .map_err(|e| AuthError::InternalError(format!("Failed to create RSA key: {e}")))?;
            let alg = match jwk.common.key_algorithm {
                Some(KeyAlgorithm::RS384) => Algorithm::RS384,
                Some(KeyAlgorithm::RS512) => Algorithm::RS512,
                _ => Algorithm::RS256,
            };
            Ok((key, alg))
        }
        AlgorithmParameters::EllipticCurve(ec) => {
            let key = DecodingKey::from_ec_components(&ec.x, &ec.y)
                .map_err(|e| AuthError::InternalError(format!("Failed to create EC key: {e}")))?;
            let alg = match jwk.common.key_algorithm {
                Some(KeyAlgorithm::ES384) => Algorithm::ES384,
                _ => Algorithm::ES256,
            };
            Ok((key, alg))
        }
        _ => Err(AuthError::InternalError(
            "Unsupported key type in JWKS".to_string(),
        )),
    }
}
