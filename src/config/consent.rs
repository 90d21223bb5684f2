// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Consent policy configuration
//!
//! Read once at startup and turned into a
//! [`ConsentPolicy`](crate::policy::ConsentPolicy).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsentConfig {
    /// Client request URLs for which consent is never asked
    ///
    /// The single entry `*` skips consent for every client.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Let the consent form choose the granted audience
    ///
    /// When false the audience reported by the authorization server is
    /// always granted, whatever the form submitted.
    #[serde(default)]
    pub override_requested_audience: bool,

    /// How long, in seconds, a remembered decision is reused
    #[serde(default = "default_remember_for")]
    pub remember_for: i64,
}

fn default_remember_for() -> i64 {
    3600
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            whitelist: Vec::new(),
            override_requested_audience: false,
            remember_for: default_remember_for(),
        }
    }
}
