// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Users allowed to sign in

use serde::{Deserialize, Serialize};

/// A user able to sign in through the login page
///
/// # Example
///
/// ```
/// use hydra_consent::config::User;
/// use hydra_consent::session::encode_password_hash;
///
/// let user = User {
///     user: "alice".to_string(),
///     pass: encode_password_hash("a long passphrase").unwrap(),
///     email: Some("alice@example.org".to_string()),
///     name: Some("Alice".to_string()),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Login name, also used as the OAuth2 subject
    pub user: String,

    /// Base64-encoded password hash
    ///
    /// Create it with `hash_password <password>` or
    /// `openssl passwd -5 <password> | base64 -w0`.
    pub pass: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Users allowed to sign in
///
/// Empty by default: nobody can sign in until a user is added with a hash
/// produced by `hash_password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccessConfig {
    #[serde(default)]
    pub users: Vec<User>,
}
