// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! # Runtime Configuration
//!
//! This module defines environment variable names and small helpers for
//! reading them. Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `VAULT_ADDR` | Transit service base URL | `http://127.0.0.1:8200` |
//! | `VAULT_TOKEN` | Credential for the transit service | Required |
//! | `TRANSIT_KEY_NAME` | Named transit key for the discount field | `discount-key` |
//! | `ORDER_API_URL` | Base URL of the downstream order service | `http://localhost:5199` |
//! | `KEYCLOAK_JWKS_URL` | Realm JWKS endpoint for JWT verification | Required for production |
//! | `KEYCLOAK_ISSUER` | Expected JWT issuer claim | Optional |
//! | `KEYCLOAK_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `SEED_REWARD_NAME` | Name of a reward to seed at startup | Optional |
//! | `SEED_REWARD_DISCOUNT` | Discount of the seeded reward | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the transit service base URL.
pub const VAULT_ADDR_ENV: &str = "VAULT_ADDR";

/// Environment variable name for the transit service credential token.
///
/// Sent on every transit call as the `X-Vault-Token` header. The server
/// holds no key material itself; this token only identifies the caller
/// to the key-custody service.
pub const VAULT_TOKEN_ENV: &str = "VAULT_TOKEN";

/// Environment variable name for the named transit key.
pub const TRANSIT_KEY_NAME_ENV: &str = "TRANSIT_KEY_NAME";

/// Environment variable name for the downstream order service base URL.
pub const ORDER_API_URL_ENV: &str = "ORDER_API_URL";

/// Environment variable name for the Keycloak realm JWKS endpoint.
pub const KEYCLOAK_JWKS_URL_ENV: &str = "KEYCLOAK_JWKS_URL";

/// Environment variable name for the expected token issuer.
pub const KEYCLOAK_ISSUER_ENV: &str = "KEYCLOAK_ISSUER";

/// Environment variable name for the expected token audience.
pub const KEYCLOAK_AUDIENCE_ENV: &str = "KEYCLOAK_AUDIENCE";

/// Read an environment variable, treating empty/whitespace values as unset.
pub fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

/// Read an environment variable, falling back to a default.
pub fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
