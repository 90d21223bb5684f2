// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HTTP server configuration

use base64::Engine;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Settings of the web server serving the login, consent and logout pages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Network address to bind to
    #[serde(default = "default_address")]
    pub address: String,

    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server name, sent as the `Server` header and shown in page titles
    #[serde(default = "default_name")]
    pub name: String,

    /// Where a successful login lands when no hook resolved it
    #[serde(default = "default_login_ok_path")]
    pub login_ok_path: String,

    /// Base64 key encrypting the session cookies, 32 or 64 bytes once decoded
    ///
    /// Generated on first start. Changing it logs every user out.
    #[serde(default = "default_session_secret")]
    pub session_secret: String,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_name() -> String {
    format!("HydraConsent/{}", env!("CARGO_PKG_VERSION"))
}

fn default_login_ok_path() -> String {
    "/".to_string()
}

fn default_session_secret() -> String {
    let mut rng = rand::rng();
    let secret: [u8; 32] = rng.random();
    base64::engine::general_purpose::STANDARD.encode(secret)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            name: default_name(),
            login_ok_path: default_login_ok_path(),
            session_secret: default_session_secret(),
        }
    }
}
