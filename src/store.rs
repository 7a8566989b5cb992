// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Store Platform

//! In-memory persistence collaborator for rewards and orders.
//!
//! The store is deliberately plain: it holds already-encrypted reward records
//! and attributed orders, and knows nothing about the transit service or
//! tokens. Lifecycle rules (encrypt-before-insert, re-encrypt-then-replace)
//! live in [`crate::lifecycle`].

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{OrderInfo, Reward};

#[derive(Default)]
pub struct InMemoryStore {
    rewards: HashMap<String, Reward>,
    orders: HashMap<String, OrderInfo>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_rewards(&self) -> Vec<Reward> {
        let mut rewards: Vec<Reward> = self.rewards.values().cloned().collect();
        rewards.sort_by(|a, b| a.id.cmp(&b.id));
        rewards
    }

    pub fn reward(&self, reward_id: &str) -> Result<Reward, ApiError> {
        self.rewards
            .get(reward_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Reward not found"))
    }

    /// Insert a reward whose discount has already been encrypted.
    pub fn insert_reward(&mut self, name: String, ciphertext: String) -> Reward {
        let id = Uuid::new_v4().to_string();
        let reward = Reward {
            id: id.clone(),
            name,
            ciphertext,
        };
        self.rewards.insert(id, reward.clone());
        reward
    }

    /// Replace a reward's name and ciphertext in one step.
    ///
    /// The caller must hold the freshly produced ciphertext before calling;
    /// the previous ciphertext is discarded only here.
    pub fn replace_reward(
        &mut self,
        reward_id: &str,
        name: String,
        ciphertext: String,
    ) -> Result<Reward, ApiError> {
        let Some(reward) = self.rewards.get_mut(reward_id) else {
            return Err(ApiError::not_found("Reward not found"));
        };
        reward.name = name;
        reward.ciphertext = ciphertext;
        Ok(reward.clone())
    }

    pub fn delete_reward(&mut self, reward_id: &str) -> Result<(), ApiError> {
        if self.rewards.remove(reward_id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found("Reward not found"))
        }
    }

    pub fn reward_count(&self) -> usize {
        self.rewards.len()
    }

    /// Record an order attributed to the given identity.
    pub fn insert_order(
        &mut self,
        username: String,
        email: String,
        product_name: String,
        product_price: f64,
    ) -> OrderInfo {
        let id = Uuid::new_v4().to_string();
        let order = OrderInfo {
            id: id.clone(),
            username,
            email,
            product_name,
            product_price,
            created_at: Utc::now(),
        };
        self.orders.insert(id, order.clone());
        order
    }

    /// Orders attributed to the given identity, newest first.
    ///
    /// Matches on username or email, mirroring how attribution was written.
    pub fn orders_for(&self, username: &str, email: &str) -> Vec<OrderInfo> {
        let mut orders: Vec<OrderInfo> = self
            .orders
            .values()
            .filter(|order| order.username == username || order.email == email)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// All orders across users, newest first.
    pub fn all_orders(&self) -> Vec<OrderInfo> {
        let mut orders: Vec<OrderInfo> = self.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }
}
