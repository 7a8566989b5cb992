// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! JWT claims and authenticated user representation.

use serde::Deserialize;

use super::roles::RoleSet;

/// Claims extracted from a Keycloak access token.
///
/// Standard OIDC claims plus the Keycloak-specific nested role claim.
/// `resource_access` is kept as a raw value because its shape is dynamic;
/// [`RoleSet::from_claim`] parses it defensively.
#[derive(Debug, Clone, Deserialize)]
pub struct KeycloakClaims {
    /// Subject (user ID).
    pub sub: String,

    /// Expiration timestamp.
    #[serde(default)]
    pub exp: i64,

    /// Issuer (realm URL).
    #[serde(default)]
    pub iss: String,

    /// Email claim, mapped from the `email` scope.
    #[serde(default)]
    pub email: Option<String>,

    /// Display name claim.
    #[serde(default)]
    pub name: Option<String>,

    /// Login name, used when no display name is present.
    #[serde(default)]
    pub preferred_username: Option<String>,

    /// Nested per-resource role claim; shape varies by provider config.
    #[serde(default)]
    pub resource_access: Option<serde_json::Value>,
}

/// Authenticated caller derived from a verified (or structurally decoded)
/// access token.
///
/// Retains the raw token so outbound calls to downstream resource services
/// can forward the exact credential the caller presented.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim).
    pub user_id: String,

    /// Email from the token, if present.
    pub email: Option<String>,

    /// Display name, falling back to the login name.
    pub display_name: String,

    /// Roles re-derived from the token on this request.
    pub roles: RoleSet,

    /// The token exactly as received, for pass-through propagation.
    pub token: String,

    /// Original issuer.
    pub issuer: String,

    /// Token expiration (Unix timestamp).
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from decoded claims plus the raw token they came from.
    pub fn from_claims(claims: KeycloakClaims, token: impl Into<String>) -> Self {
        let roles = claims
            .resource_access
            .as_ref()
            .map(RoleSet::from_claim)
            .unwrap_or_default();

        let display_name = claims
            .name
            .or(claims.preferred_username)
            .unwrap_or_else(|| "unknown_user".to_string());

        Self {
            user_id: claims.sub,
            email: claims.email,
            display_name,
            roles,
            token: token.into(),
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }

    /// Whether this caller may see orders across all users.
    pub fn is_realm_admin(&self) -> bool {
        self.roles.is_realm_admin()
    }

    /// Email used for order attribution when the claim is absent.
    pub fn attribution_email(&self) -> String {
        self.email.clone().unwrap_or_else(|| "no@email".to_string())
    }
}
