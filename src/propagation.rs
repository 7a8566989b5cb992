// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Bearer-token propagation to the downstream order service.
//!
//! Every outbound call carries the exact token the caller presented, as a
//! pass-through trust credential: no token exchange, no minted
//! service-to-service secret, no audience restriction. The downstream
//! service re-validates and re-derives identity from the forwarded token
//! itself. The tradeoff is that downstream services see the original
//! user-facing token verbatim; do not silently upgrade this to token
//! exchange without flagging the behavior change.
//!
//! The client itself is stateless; the token lives in the caller's
//! authenticated session and is passed explicitly per call.
//!
//! This service answers its own order endpoints from the local store. The
//! client here is the outbound library surface that front-end deployments
//! link against to reach a separately deployed order service.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::RoleSet;
use crate::config::{env_or_default, ORDER_API_URL_ENV};
use crate::models::{CreateOrderRequest, OrderInfo};

const DEFAULT_ORDER_API_URL: &str = "http://localhost:5199";

#[derive(Debug, thiserror::Error)]
pub enum OrderApiError {
    #[error("order service request failed: {0}")]
    Request(String),

    #[error("order service returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("order service response was invalid: {0}")]
    InvalidResponse(String),
}

/// Which slice of orders a caller is entitled to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders attributed to the caller's own identity.
    Own,
    /// Orders across all users (realm-admin only).
    All,
}

impl OrderScope {
    /// Entitlement decision: realm-admins may list everything, everyone
    /// else is scoped to self.
    pub fn for_roles(roles: &RoleSet) -> OrderScope {
        if roles.is_realm_admin() {
            OrderScope::All
        } else {
            OrderScope::Own
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            OrderScope::Own => "/orders",
            OrderScope::All => "/orders_all",
        }
    }
}

/// Client for the downstream order service.
#[derive(Debug, Clone)]
pub struct OrderApiClient {
    base_url: String,
    http: Client,
}

impl OrderApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, OrderApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| OrderApiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_env() -> Result<Self, OrderApiError> {
        Self::new(env_or_default(ORDER_API_URL_ENV, DEFAULT_ORDER_API_URL))
    }

    /// Place an order on behalf of the caller.
    ///
    /// The body carries product data only; the order service derives
    /// username/email from the forwarded token's claims.
    pub async fn place_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> Result<OrderInfo, OrderApiError> {
        let url = format!("{}/orders", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| OrderApiError::Request(format!("POST {url} failed: {e}")))?;

        read_json(response, &url).await
    }

    /// Fetch orders at the given scope.
    pub async fn fetch_orders(
        &self,
        token: &str,
        scope: OrderScope,
    ) -> Result<Vec<OrderInfo>, OrderApiError> {
        let url = format!("{}{}", self.base_url, scope.path());
        debug!(scope = ?scope, "fetching orders from order service");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| OrderApiError::Request(format!("GET {url} failed: {e}")))?;

        read_json(response, &url).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    url: &str,
) -> Result<T, OrderApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OrderApiError::Remote {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| OrderApiError::InvalidResponse(format!("{url} invalid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use chrono::Utc;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SeenAuth(Arc<Mutex<Vec<String>>>);

    fn record_auth(seen: &SeenAuth, headers: &HeaderMap) {
        if let Some(value) = headers.get("authorization") {
            seen.0
                .lock()
                .unwrap()
                .push(value.to_str().unwrap_or_default().to_string());
        }
    }

    fn sample_order() -> serde_json::Value {
        json!({
            "id": "o1",
            "username": "Alice Example",
            "email": "alice@example.com",
            "product_name": "Mug",
            "product_price": 9.5,
            "created_at": Utc::now(),
        })
    }

    async fn spawn_order_stub(seen: SeenAuth) -> SocketAddr {
        let list_seen = seen.clone();
        let all_seen = seen.clone();
        let app = Router::new()
            .route(
                "/orders",
                get({
                    move |headers: HeaderMap| {
                        let seen = list_seen.clone();
                        async move {
                            record_auth(&seen, &headers);
                            Json(json!([sample_order()]))
                        }
                    }
                })
                .post({
                    move |headers: HeaderMap, Json(_body): Json<serde_json::Value>| {
                        let seen = seen.clone();
                        async move {
                            record_auth(&seen, &headers);
                            Json(sample_order())
                        }
                    }
                }),
            )
            .route(
                "/orders_all",
                get(move |headers: HeaderMap| {
                    let seen = all_seen.clone();
                    async move {
                        record_auth(&seen, &headers);
                        Json(json!([sample_order(), sample_order()]))
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn from_env_defaults_to_local_order_service() {
        let _env = crate::config::tests::env_guard();
        std::env::remove_var(ORDER_API_URL_ENV);
        let client = OrderApiClient::from_env().unwrap();
        assert_eq!(client.base_url, "http://localhost:5199");

        std::env::set_var(ORDER_API_URL_ENV, "http://orders.internal:5199/");
        let client = OrderApiClient::from_env().unwrap();
        // Trailing slash is normalized away.
        assert_eq!(client.base_url, "http://orders.internal:5199");
        std::env::remove_var(ORDER_API_URL_ENV);
    }

    #[test]
    fn scope_selection_follows_realm_admin_role() {
        let admin = RoleSet::from_claim(&json!({
            "realm-management": { "roles": ["realm-admin"] }
        }));
        assert_eq!(OrderScope::for_roles(&admin), OrderScope::All);
        assert_eq!(OrderScope::All.path(), "/orders_all");

        let plain = RoleSet::default();
        assert_eq!(OrderScope::for_roles(&plain), OrderScope::Own);
        assert_eq!(OrderScope::Own.path(), "/orders");
    }

    #[tokio::test]
    async fn forwards_the_exact_bearer_token() {
        let seen = SeenAuth::default();
        let addr = spawn_order_stub(seen.clone()).await;
        let client = OrderApiClient::new(format!("http://{addr}")).unwrap();

        let token = "header.payload.signature";
        client.fetch_orders(token, OrderScope::Own).await.unwrap();
        client
            .place_order(
                token,
                &CreateOrderRequest {
                    product_name: "Mug".into(),
                    product_price: 9.5,
                },
            )
            .await
            .unwrap();

        let recorded = seen.0.lock().unwrap().clone();
        assert_eq!(recorded.len(), 2);
        // Unmodified pass-through on every call.
        assert!(recorded.iter().all(|h| h == "Bearer header.payload.signature"));
    }

    #[tokio::test]
    async fn fetch_orders_parses_list() {
        let addr = spawn_order_stub(SeenAuth::default()).await;
        let client = OrderApiClient::new(format!("http://{addr}")).unwrap();

        let own = client.fetch_orders("t", OrderScope::Own).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].product_name, "Mug");

        let all = client.fetch_orders("t", OrderScope::All).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn remote_error_carries_status_and_body() {
        let app = Router::new().route(
            "/orders",
            get(|| async { (StatusCode::UNAUTHORIZED, "token rejected") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = OrderApiClient::new(format!("http://{addr}")).unwrap();
        let err = client.fetch_orders("t", OrderScope::Own).await.unwrap_err();
        match err {
            OrderApiError::Remote { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("rejected"));
            }
            other => panic!("expected Remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        let client = OrderApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.fetch_orders("t", OrderScope::Own).await.unwrap_err();
        assert!(matches!(err, OrderApiError::Request(_)));
    }
}
