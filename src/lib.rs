// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! Store Rewards Server - Envelope-encrypted reward service
//!
//! This crate provides a reward management service whose sensitive discount
//! values are envelope-encrypted through a Vault-style transit engine, with
//! Keycloak bearer-token authentication and role-based order access.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication and authorization (Keycloak JWT)
//! - `transit` - Remote transit encrypt/decrypt client
//! - `lifecycle` - Reward create/reveal/update/delete orchestration
//! - `propagation` - Bearer pass-through client for the order service

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod propagation;
pub mod state;
pub mod store;
pub mod transit;
