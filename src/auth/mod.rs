// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! # Authentication Module
//!
//! Keycloak bearer-token authentication and role resolution.
//!
//! ## Auth Flow
//!
//! 1. The user authenticates once against the identity provider; the
//!    front-end holds the issued access token for the session.
//! 2. Requests arrive with `Authorization: Bearer <token>` — the same token
//!    is forwarded verbatim across service boundaries (pass-through
//!    delegation, no token exchange).
//! 3. This service independently re-derives identity and roles from the
//!    token on every request:
//!    - `sub` → canonical `user_id`
//!    - `name` / `preferred_username` / `email` → order attribution
//!    - `resource_access` → per-resource [`RoleSet`], parsed fail-closed
//!
//! ## Security
//!
//! - All reward and order endpoints require authentication
//! - With `KEYCLOAK_JWKS_URL` configured, signature, expiry and issuer are
//!   verified against the realm JWKS (cached with TTL)
//! - Malformed role claims grant no privilege rather than failing requests
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod roles;

pub use claims::{AuthenticatedUser, KeycloakClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use jwks::JwksManager;
pub use roles::{RoleSet, REALM_ADMIN_ROLE, REALM_MANAGEMENT_RESOURCE};
