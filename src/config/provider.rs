// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how to reach the authorization server's admin API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Base URL of the admin API
    #[serde(default = "default_admin_url")]
    pub admin_url: String,

    /// Timeout of a single admin call, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_admin_url() -> String {
    "http://localhost:4445".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            admin_url: default_admin_url(),
            timeout: default_timeout(),
        }
    }
}
