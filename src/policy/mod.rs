// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Consent policy
//!
//! Pure decision logic used by the consent phase: whether a consent prompt
//! can be skipped, which audience is granted, and how the accept payload is
//! assembled. Nothing in here performs I/O.

use std::collections::HashSet;

use log::warn;
use serde_json::{Map, Value};

use crate::config::ConsentConfig;
use crate::provider::ConsentRequest;

pub use crate::provider::GrantDecision;

/// Whitelist entry that skips consent for every client
pub const WILDCARD: &str = "*";

/// Client request URLs for which consent is granted without prompting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsentWhitelist {
    entries: HashSet<String>,
}

impl ConsentWhitelist {
    /// Build a whitelist from individual entries
    ///
    /// Entries are trimmed and empty entries are ignored, so an unset
    /// configuration never whitelists a request with an empty URL.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    /// Build a whitelist from a comma separated list
    pub fn from_csv(raw: &str) -> Self {
        Self::from_entries(raw.split(','))
    }

    pub fn contains(&self, request_url: &str) -> bool {
        !request_url.is_empty() && self.entries.contains(request_url)
    }

    pub fn allows_all(&self) -> bool {
        self.entries.contains(WILDCARD)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a consent decision comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentOrigin {
    /// Granted without user interaction (provider skip or whitelist)
    Automatic,
    /// Submitted by the resource owner through the consent form
    UserSubmission,
}

/// Remember-me settings attached to a grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RememberMe {
    pub remember: bool,
    pub remember_for: i64,
}

/// Process-wide consent settings, immutable once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ConsentPolicy {
    pub whitelist: ConsentWhitelist,
    pub override_requested_audience: bool,
    /// Seconds during which the provider may skip the same prompt again
    pub remember_for: i64,
}

impl Default for ConsentPolicy {
    fn default() -> Self {
        Self::from_config(&ConsentConfig::default())
    }
}

impl ConsentPolicy {
    pub fn from_config(config: &ConsentConfig) -> Self {
        Self {
            whitelist: ConsentWhitelist::from_entries(&config.whitelist),
            override_requested_audience: config.override_requested_audience,
            remember_for: config.remember_for,
        }
    }

    pub fn remember(&self, remember: bool) -> RememberMe {
        RememberMe {
            remember,
            remember_for: self.remember_for,
        }
    }
}

/// Decide whether a consent request can be granted without prompting
///
/// True when the provider reports the subject already consented, when the
/// client's request URL is whitelisted, or when the whitelist holds the
/// wildcard entry.
pub fn should_skip_consent(record: &ConsentRequest, whitelist: &ConsentWhitelist) -> bool {
    record.skip || whitelist.allows_all() || whitelist.contains(&record.request_url)
}

/// Pick the audience granted to the access token
///
/// The submitted audience is only honoured for a user submission when the
/// operator enabled the override; otherwise the provider-reported audience
/// is returned unchanged, so a client cannot broaden its own grant.
pub fn resolve_audience(
    record: &ConsentRequest,
    submitted: &[String],
    override_enabled: bool,
    origin: ConsentOrigin,
) -> Vec<String> {
    match origin {
        ConsentOrigin::UserSubmission if override_enabled => submitted.to_vec(),
        _ => record.requested_access_token_audience.clone(),
    }
}

/// Assemble the accept-consent payload
///
/// Scopes and audience are kept in the order given. A granted scope the
/// client never requested is kept (the submission is authoritative) but
/// reported.
pub fn build_grant(
    record: &ConsentRequest,
    scopes: Vec<String>,
    audience: Vec<String>,
    session: Map<String, Value>,
    remember: Option<RememberMe>,
) -> GrantDecision {
    for scope in scopes
        .iter()
        .filter(|scope| !record.requested_scope.contains(scope))
    {
        warn!(
            "Granting scope '{}' which was not requested by client {}",
            scope,
            record
                .client
                .as_ref()
                .map(|c| c.client_id.as_str())
                .unwrap_or("(unknown)")
        );
    }

    GrantDecision {
        grant_scope: scopes,
        grant_access_token_audience: audience,
        session,
        remember: remember.map(|r| r.remember),
        remember_for: remember.map(|r| r.remember_for),
    }
}
