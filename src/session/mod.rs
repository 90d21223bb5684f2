// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Session and identity bridge
//!
//! The handshake only needs three things from the application's user layer:
//! load a principal by id, check a password, and find who is logged in for the
//! current request. These are expressed as the [`IdentityBridge`] trait, with
//! [`ConfigIdentityBridge`] serving users declared in the configuration file.
//!
//! Local session state is reached through [`SessionStore`], implemented for
//! Rocket's cookie jar (private, encrypted cookies) and by [`MemorySession`].

mod config_bridge;
mod store;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use config_bridge::{encode_password_hash, verify_password_hash, ConfigIdentityBridge};
pub use store::{MemorySession, SESSION_KEY};

/// Errors of the identity layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No principal exists with this id
    #[error("Unknown principal: {0}")]
    NotFound(String),

    /// The user store failed for another reason
    #[error("User store failure: {0}")]
    Store(String),
}

/// An authenticated (or authenticatable) resource owner
pub trait Principal: Send + Sync {
    /// Principal identifier, used as the provider subject
    fn pid(&self) -> &str;

    /// Claims forwarded to the provider when consent is granted
    ///
    /// Principals with nothing to contribute keep the default empty map.
    fn session_payload(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Per-request key/value session state
pub trait SessionStore: Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    /// Drop every value held for this browser
    fn clear(&self);
}

/// Access to the application's users
#[async_trait]
pub trait IdentityBridge: Send + Sync {
    async fn load_user_by_pid(&self, pid: &str) -> Result<Box<dyn Principal>, IdentityError>;

    async fn verify_password(&self, principal: &dyn Principal, password: &str) -> bool;

    /// The principal attached to the current session, if any
    async fn current_user(&self, session: &dyn SessionStore) -> Option<Box<dyn Principal>> {
        let pid = session.get(SESSION_KEY)?;
        self.load_user_by_pid(&pid).await.ok()
    }
}
