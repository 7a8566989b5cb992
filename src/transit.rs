// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Transit envelope-encryption client.
//!
//! The symmetric key never leaves the remote key-custody service; this client
//! only ships plaintext/ciphertext across its encrypt and decrypt endpoints:
//!
//! - `POST {addr}/v1/transit/encrypt/{key}` body `{"plaintext": <base64>}`
//!   → `{"data": {"ciphertext": <string>}}`
//! - `POST {addr}/v1/transit/decrypt/{key}` body `{"ciphertext": <string>}`
//!   → `{"data": {"plaintext": <base64>}}`
//!
//! Every call is a single synchronous round trip. Failures are surfaced on
//! the first attempt; there is no retry or backoff. Plaintext values are
//! never logged or retained beyond the call's scope.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::{
    env_optional, env_or_default, TRANSIT_KEY_NAME_ENV, VAULT_ADDR_ENV, VAULT_TOKEN_ENV,
};

const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";
const DEFAULT_TRANSIT_KEY_NAME: &str = "discount-key";

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("transit configuration missing: {0}")]
    MissingConfig(String),

    #[error("transit request failed: {0}")]
    Request(String),

    #[error("transit service returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("transit response was invalid: {0}")]
    InvalidResponse(String),

    #[error("decrypted payload is not a valid discount: {0}")]
    InvalidSensitiveValue(String),
}

/// Client for the remote transit-key service.
///
/// Holds no key material; the `token` only identifies this caller to the
/// custody service via the `X-Vault-Token` header.
#[derive(Debug, Clone)]
pub struct TransitClient {
    address: String,
    token: String,
    key_name: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct EncryptData {
    ciphertext: String,
}

#[derive(Debug, Deserialize)]
struct EncryptResponse {
    data: EncryptData,
}

#[derive(Debug, Deserialize)]
struct DecryptData {
    plaintext: String,
}

#[derive(Debug, Deserialize)]
struct DecryptResponse {
    data: DecryptData,
}

impl TransitClient {
    pub fn new(
        address: impl Into<String>,
        token: impl Into<String>,
        key_name: impl Into<String>,
    ) -> Result<Self, TransitError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| TransitError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            address: address.into().trim_end_matches('/').to_string(),
            token: token.into(),
            key_name: key_name.into(),
            http,
        })
    }

    pub fn from_env() -> Result<Self, TransitError> {
        let address = env_or_default(VAULT_ADDR_ENV, DEFAULT_VAULT_ADDR);
        let token = env_optional(VAULT_TOKEN_ENV)
            .ok_or_else(|| TransitError::MissingConfig(VAULT_TOKEN_ENV.to_string()))?;
        let key_name = env_or_default(TRANSIT_KEY_NAME_ENV, DEFAULT_TRANSIT_KEY_NAME);
        Self::new(address, token, key_name)
    }

    /// Name of the transit key this client encrypts and decrypts under.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Encrypt a canonical plaintext string, returning the opaque ciphertext.
    ///
    /// The ciphertext embeds key-version metadata chosen by the remote
    /// service; encrypting the same plaintext twice may yield different
    /// ciphertexts.
    pub async fn encrypt(&self, plaintext: &str) -> Result<String, TransitError> {
        let payload = json!({ "plaintext": BASE64.encode(plaintext.as_bytes()) });
        let url = format!("{}/v1/transit/encrypt/{}", self.address, self.key_name);

        let response: EncryptResponse = self.post_json(&url, &payload).await?;
        Ok(response.data.ciphertext)
    }

    /// Decrypt a ciphertext back to its canonical plaintext string.
    pub async fn decrypt(&self, ciphertext: &str) -> Result<String, TransitError> {
        let payload = json!({ "ciphertext": ciphertext });
        let url = format!("{}/v1/transit/decrypt/{}", self.address, self.key_name);

        let response: DecryptResponse = self.post_json(&url, &payload).await?;
        let bytes = BASE64
            .decode(response.data.plaintext.as_bytes())
            .map_err(|e| TransitError::InvalidResponse(format!("plaintext not base64: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| TransitError::InvalidResponse(format!("plaintext not UTF-8: {e}")))
    }

    /// Decrypt a ciphertext and parse it as a discount value.
    ///
    /// A payload that does not parse as a number is rejected outright rather
    /// than substituted with a default.
    pub async fn decrypt_discount(&self, ciphertext: &str) -> Result<f64, TransitError> {
        let plaintext = self.decrypt(ciphertext).await?;
        plaintext
            .trim()
            .parse::<f64>()
            .map_err(|_| TransitError::InvalidSensitiveValue(plaintext))
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, TransitError> {
        let response = self
            .http
            .post(url)
            .header("X-Vault-Token", &self.token)
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| TransitError::Request(format!("POST {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransitError::InvalidResponse(format!("POST {url} invalid JSON: {e}")))
    }
}

/// Canonical string form of a discount for encryption.
///
/// Rust's shortest round-trip formatting already prints `15.0` as `"15"`
/// and `12.5` as `"12.5"`, and preserves every finite value exactly through
/// a decrypt-then-parse round trip.
pub fn canonical_discount(discount: f64) -> String {
    discount.to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    /// Minimal stand-in for the transit engine: "encrypts" by wrapping the
    /// base64 plaintext in a versioned envelope and remembers the mapping so
    /// decrypt can invert it.
    #[derive(Clone, Default)]
    pub(crate) struct StubTransit {
        entries: Arc<Mutex<HashMap<String, String>>>,
        counter: Arc<Mutex<u64>>,
        pub(crate) fail_encrypt: Arc<Mutex<bool>>,
    }

    async fn stub_encrypt(
        State(stub): State<StubTransit>,
        Json(body): Json<serde_json::Value>,
    ) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
        if *stub.fail_encrypt.lock().unwrap() {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "transit engine is sealed".to_string(),
            ));
        }
        let plaintext_b64 = body["plaintext"].as_str().unwrap_or_default().to_string();
        let mut counter = stub.counter.lock().unwrap();
        *counter += 1;
        let ciphertext = format!("vault:v{}:{}", *counter, plaintext_b64);
        stub.entries
            .lock()
            .unwrap()
            .insert(ciphertext.clone(), plaintext_b64);
        Ok(Json(serde_json::json!({ "data": { "ciphertext": ciphertext } })))
    }

    async fn stub_decrypt(
        State(stub): State<StubTransit>,
        Json(body): Json<serde_json::Value>,
    ) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
        let ciphertext = body["ciphertext"].as_str().unwrap_or_default();
        let entries = stub.entries.lock().unwrap();
        match entries.get(ciphertext) {
            Some(plaintext_b64) => Ok(Json(
                serde_json::json!({ "data": { "plaintext": plaintext_b64 } }),
            )),
            None => Err((StatusCode::BAD_REQUEST, "invalid ciphertext".to_string())),
        }
    }

    /// Spawn the stub on an ephemeral port and return its address plus a
    /// handle for toggling failures.
    pub(crate) async fn spawn_stub() -> (SocketAddr, StubTransit) {
        let stub = StubTransit::default();
        let app = Router::new()
            .route("/v1/transit/encrypt/{key}", post(stub_encrypt))
            .route("/v1/transit/decrypt/{key}", post(stub_decrypt))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, stub)
    }

    pub(crate) async fn stub_client() -> (TransitClient, StubTransit) {
        let (addr, stub) = spawn_stub().await;
        let client =
            TransitClient::new(format!("http://{addr}"), "test-token", "discount-key").unwrap();
        (client, stub)
    }

    #[tokio::test]
    async fn decrypt_inverts_encrypt() {
        let (client, _stub) = stub_client().await;
        for plaintext in ["15", "12.5", "0", "99.99"] {
            let ciphertext = client.encrypt(plaintext).await.unwrap();
            assert_eq!(client.decrypt(&ciphertext).await.unwrap(), plaintext);
        }
    }

    #[tokio::test]
    async fn reencrypting_may_change_ciphertext() {
        let (client, _stub) = stub_client().await;
        let first = client.encrypt("15").await.unwrap();
        let second = client.encrypt("15").await.unwrap();
        // Key version advances per call in the stub; both still decrypt.
        assert_ne!(first, second);
        assert_eq!(client.decrypt(&first).await.unwrap(), "15");
        assert_eq!(client.decrypt(&second).await.unwrap(), "15");
    }

    #[tokio::test]
    async fn remote_failure_carries_status_and_body() {
        let (client, stub) = stub_client().await;
        *stub.fail_encrypt.lock().unwrap() = true;

        let err = client.encrypt("15").await.unwrap_err();
        match err {
            TransitError::Remote { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("sealed"));
            }
            other => panic!("expected Remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_ciphertext_is_a_remote_error() {
        let (client, _stub) = stub_client().await;
        let err = client.decrypt("vault:v1:bogus").await.unwrap_err();
        assert!(matches!(err, TransitError::Remote { status: 400, .. }));
    }

    #[tokio::test]
    async fn decrypt_discount_parses_numeric_plaintext() {
        let (client, _stub) = stub_client().await;
        let ciphertext = client.encrypt("12.5").await.unwrap();
        assert_eq!(client.decrypt_discount(&ciphertext).await.unwrap(), 12.5);
    }

    #[tokio::test]
    async fn decrypt_discount_rejects_non_numeric_plaintext() {
        let (client, _stub) = stub_client().await;
        let ciphertext = client.encrypt("not-a-number").await.unwrap();
        let err = client.decrypt_discount(&ciphertext).await.unwrap_err();
        assert!(matches!(err, TransitError::InvalidSensitiveValue(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        // Port 9 is discard; nothing is listening there.
        let client = TransitClient::new("http://127.0.0.1:9", "t", "k").unwrap();
        let err = client.encrypt("15").await.unwrap_err();
        assert!(matches!(err, TransitError::Request(_)));
    }

    #[test]
    fn canonical_discount_formats() {
        assert_eq!(canonical_discount(15.0), "15");
        assert_eq!(canonical_discount(12.5), "12.5");
        assert_eq!(canonical_discount(0.0), "0");
    }

    #[test]
    fn canonical_discount_preserves_large_magnitudes() {
        // Fractionless values outside i64 range must not be clamped.
        for value in [1e300, -2.5e17, 1.8e19] {
            let canonical = canonical_discount(value);
            assert_eq!(canonical.parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn from_env_requires_token() {
        let _env = crate::config::tests::env_guard();
        std::env::remove_var(VAULT_TOKEN_ENV);
        let err = TransitClient::from_env().unwrap_err();
        assert!(matches!(err, TransitError::MissingConfig(_)));
    }
}
