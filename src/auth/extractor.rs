// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! The extractor runs before any store or transit access: a request with no
//! (or an unusable) token is rejected without touching domain state.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, decode_header, Validation};

use super::{AuthError, AuthenticatedUser, KeycloakClaims};
use crate::state::AppState;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Extractor for authenticated users.
///
/// ## Authentication Modes
///
/// - **Production mode** (KEYCLOAK_JWKS_URL set): full signature, expiry and
///   issuer verification against the realm JWKS.
/// - **Development mode** (no JWKS URL): structural decode only, manual
///   expiry check, no signature verification.
///
/// In both modes the service re-derives identity and roles from the token
/// itself; an upstream-asserted identity string is never trusted.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A middleware-style layer may have authenticated already.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::InvalidAuthHeader)?;

        if token.is_empty() {
            return Err(AuthError::InvalidAuthHeader);
        }

        let user = verify_jwt(token, &state.auth).await?;
        Ok(Auth(user))
    }
}

/// Verify a token and extract the authenticated user.
async fn verify_jwt(
    token: &str,
    auth_config: &crate::state::AuthConfig,
) -> Result<AuthenticatedUser, AuthError> {
    if let Some(ref jwks) = auth_config.jwks {
        verify_jwt_production(token, jwks, auth_config).await
    } else {
        verify_jwt_development(token)
    }
}

/// Production JWT verification with JWKS.
async fn verify_jwt_production(
    token: &str,
    jwks: &super::JwksManager,
    auth_config: &crate::state::AuthConfig,
) -> Result<AuthenticatedUser, AuthError> {
    // Decode header to get kid (key ID)
    let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

    let (decoding_key, algorithm) = if let Some(kid) = &header.kid {
        jwks.get_decoding_key(kid).await?
    } else {
        // No kid in header, try any key
        jwks.get_any_decoding_key().await?
    };

    let mut validation = Validation::new(algorithm);
    validation.leeway = CLOCK_SKEW_LEEWAY;

    if let Some(ref issuer) = auth_config.issuer {
        validation.set_issuer(&[issuer]);
    }

    // Keycloak sets `aud` loosely, so audience is only validated when
    // explicitly configured.
    if let Some(ref audience) = auth_config.audience {
        validation.set_audience(&[audience]);
    } else {
        validation.validate_aud = false;
    }

    let token_data =
        decode::<KeycloakClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            _ => AuthError::MalformedToken,
        })?;

    Ok(AuthenticatedUser::from_claims(token_data.claims, token))
}

/// Development JWT verification (no signature check).
///
/// WARNING: This should only be used in development environments.
fn verify_jwt_development(token: &str) -> Result<AuthenticatedUser, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<KeycloakClaims>(token)
        .map_err(|_e| AuthError::MalformedToken)?;

    let claims = token_data.claims;

    // Check expiration manually
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
        return Err(AuthError::TokenExpired);
    }

    Ok(AuthenticatedUser::from_claims(claims, token))
}
