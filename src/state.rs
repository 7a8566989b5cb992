// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::JwksManager;
use crate::store::InMemoryStore;
use crate::transit::TransitClient;

/// Token verification configuration.
///
/// With `jwks` unset the service runs in development mode and decodes tokens
/// without signature verification.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub jwks: Option<JwksManager>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub transit: Arc<TransitClient>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(store: InMemoryStore, transit: TransitClient) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            transit: Arc::new(transit),
            auth: AuthConfig::default(),
        }
    }

    pub fn with_auth_config(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// State wired to an unreachable transit address, for tests that must
    /// not touch the transit service.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let transit = TransitClient::new("http://127.0.0.1:9", "test-token", "discount-key")
            .expect("test transit client");
        Self::new(InMemoryStore::new(), transit)
    }

    /// State wired to a live (stub) transit address.
    #[cfg(test)]
    pub fn for_tests_with_transit(transit: TransitClient) -> Self {
        Self::new(InMemoryStore::new(), transit)
    }
}
