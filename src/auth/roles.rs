// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Role resolution from the token's nested `resource_access` claim.
//!
//! Keycloak-style tokens carry per-resource roles as
//! `resource_access: { "<resource>": { "roles": [..] } }`. The shape is
//! dynamic, so parsing is defensive throughout: an unreadable token, a
//! missing claim, a non-object entry, or a malformed `roles` array never
//! raises an error — it resolves to an empty mapping and therefore to no
//! privilege (fail-closed).

use std::collections::{BTreeMap, BTreeSet};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;

/// Resource whose roles gate realm-wide administration.
pub const REALM_MANAGEMENT_RESOURCE: &str = "realm-management";

/// Role required to list orders across all users.
pub const REALM_ADMIN_ROLE: &str = "realm-admin";

/// Mapping from resource name to the set of role names the token grants.
///
/// Derived per request and never persisted or cached across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeMap<String, BTreeSet<String>>);

impl RoleSet {
    /// Resolve roles from a raw token string without requiring prior
    /// verification.
    ///
    /// Any anomaly at any level collapses to an empty result rather than
    /// propagating a parse error.
    pub fn from_token(token: &str) -> RoleSet {
        let Some(payload) = decode_payload(token) else {
            return RoleSet::default();
        };
        match payload.get("resource_access") {
            Some(claim) => Self::from_claim(claim),
            None => RoleSet::default(),
        }
    }

    /// Resolve roles from an already-extracted `resource_access` claim value.
    ///
    /// The claim may arrive as a JSON object or, as some providers emit it,
    /// a JSON-encoded string.
    pub fn from_claim(claim: &Value) -> RoleSet {
        let object = match claim {
            Value::Object(map) => map.clone(),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                _ => return RoleSet::default(),
            },
            _ => return RoleSet::default(),
        };

        let mut mapping = BTreeMap::new();
        for (resource, entry) in object {
            let Some(roles) = entry.get("roles").and_then(Value::as_array) else {
                // Entry without a roles array grants nothing for that resource.
                continue;
            };
            let role_set: BTreeSet<String> = roles
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            mapping.insert(resource, role_set);
        }
        RoleSet(mapping)
    }

    /// Exact, case-sensitive membership check.
    pub fn has_role(&self, resource: &str, role: &str) -> bool {
        self.0
            .get(resource)
            .map(|roles| roles.contains(role))
            .unwrap_or(false)
    }

    /// Whether the token grants realm-wide administration.
    pub fn is_realm_admin(&self) -> bool {
        self.has_role(REALM_MANAGEMENT_RESOURCE, REALM_ADMIN_ROLE)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Check a role directly against a raw token string.
pub fn has_role(token: &str, resource: &str, role: &str) -> bool {
    RoleSet::from_token(token).has_role(resource, role)
}

/// Decode the payload segment of a JWT without verifying it.
fn decode_payload(token: &str) -> Option<Value> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    // Signature segment must exist for this to be a JWT at all.
    segments.next()?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('=').as_bytes())
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
