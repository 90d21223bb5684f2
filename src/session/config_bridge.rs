// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Identity bridge backed by the `access.users` configuration section

use async_trait::async_trait;
use base64::Engine;
use log::debug;
use serde_json::{Map, Value};

use super::{IdentityBridge, IdentityError, Principal};
use crate::config::{AccessConfig, User};

impl Principal for User {
    fn pid(&self) -> &str {
        &self.user
    }

    /// Profile claims placed into the ID token
    fn session_payload(&self) -> Map<String, Value> {
        let mut id_token = Map::new();
        if let Some(email) = &self.email {
            id_token.insert("email".to_string(), Value::String(email.clone()));
        }
        if let Some(name) = &self.name {
            id_token.insert("name".to_string(), Value::String(name.clone()));
        }

        let mut payload = Map::new();
        payload.insert("id_token".to_string(), Value::Object(id_token));
        payload
    }
}

/// Serves the users declared in the configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigIdentityBridge {
    users: Vec<User>,
}

impl ConfigIdentityBridge {
    pub fn new(access: &AccessConfig) -> Self {
        Self {
            users: access.users.clone(),
        }
    }

    fn find(&self, pid: &str) -> Option<&User> {
        self.users.iter().find(|user| user.user == pid)
    }
}

#[async_trait]
impl IdentityBridge for ConfigIdentityBridge {
    async fn load_user_by_pid(&self, pid: &str) -> Result<Box<dyn Principal>, IdentityError> {
        self.find(pid)
            .cloned()
            .map(|user| Box::new(user) as Box<dyn Principal>)
            .ok_or_else(|| IdentityError::NotFound(pid.to_string()))
    }

    async fn verify_password(&self, principal: &dyn Principal, password: &str) -> bool {
        match self.find(principal.pid()) {
            Some(user) => verify_password_hash(password, &user.pass),
            None => false,
        }
    }
}

/// Check a password against a base64-encoded crypt(3) hash
///
/// The encoded hash is what `openssl passwd -5 <password> | base64 -w0`
/// prints, so a trailing newline inside the decoded value is ignored.
pub fn verify_password_hash(password: &str, encoded: &str) -> bool {
    let Ok(hash_bytes) = base64::engine::general_purpose::STANDARD.decode(encoded.trim()) else {
        debug!("Password hash is not valid base64");
        return false;
    };
    let hash_bytes = hash_bytes.strip_suffix(b"\n").unwrap_or(&hash_bytes);
    let hash_bytes = hash_bytes.strip_suffix(b"\r").unwrap_or(hash_bytes);

    match std::str::from_utf8(hash_bytes) {
        // The stored hash is in the format $algo$salt$hash
        Ok(stored_hash) => pwhash::unix::verify(password, stored_hash),
        Err(_) => false,
    }
}

/// Produce the base64-encoded SHA-512 crypt hash stored in `access.users[].pass`
pub fn encode_password_hash(password: &str) -> Result<String, pwhash::error::Error> {
    let hash = pwhash::sha512_crypt::hash(password)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(hash))
}
