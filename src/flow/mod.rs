// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Challenge orchestration
//!
//! [`ChallengeFlow`] drives the three phases of the handshake with the
//! provider. Each phase has a *show* operation (GET, challenge read from the
//! query string) and a *submit* operation (POST, challenge read back from the
//! hidden form field). Every operation follows the same shape:
//!
//! 1. check preconditions (challenge present, credentials valid, challenge
//!    still known to the provider)
//! 2. resolve the challenge with at most one accept or reject call
//! 3. answer with a [`FlowOutcome`]
//!
//! Operations never retry a provider call and never produce a redirect after
//! an error.

mod consent;
mod context;
mod forms;
mod hooks;
mod login;
mod logout;


use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::policy::ConsentPolicy;
use crate::provider::{AdminApi, ProviderError};
use crate::session::{IdentityBridge, IdentityError};

pub use context::{RequestContext, ViewData};
pub use forms::{
    safe_local_redirect, ChallengeValues, ConsentValues, CredentialValues, LogoutValues,
    RedirectValues, RememberValues,
};
pub use hooks::{AcceptLoginHook, AuthEvent, AuthHook, AuthHooks, HookFlow};

/// Notice shown after a confirmed logout
pub const LOGGED_OUT_NOTICE: &str = "You have been logged out";
/// Notice shown after a declined logout
pub const LOGOUT_DECLINED_NOTICE: &str = "You are being redirected away";
/// Error shown when the credentials do not match
pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";

/// Opaque single-use token issued by the provider
///
/// Never empty. The value is kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge(String);

impl Challenge {
    pub fn new(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pages the flow can ask to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Consent,
    Logout,
    Error,
}

impl Page {
    pub fn template_name(self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Consent => "consent",
            Page::Logout => "logout",
            Page::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStatus {
    /// 302
    Found,
    /// 307
    Temporary,
}

impl RedirectStatus {
    pub fn code(self) -> u16 {
        match self {
            RedirectStatus::Found => 302,
            RedirectStatus::Temporary => 307,
        }
    }
}

/// Where to send the browser next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub location: String,
    pub status: RedirectStatus,
    /// User-facing notice to display on the next page
    pub notice: Option<String>,
}

impl Redirection {
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: RedirectStatus::Found,
            notice: None,
        }
    }

    pub fn temporary(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: RedirectStatus::Temporary,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Result of a phase operation
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// The request carried no challenge; nothing was done
    Deferred,
    /// Render a page
    Render {
        page: Page,
        status: u16,
        context: RequestContext,
    },
    Redirect(Redirection),
}

impl FlowOutcome {
    pub fn render(page: Page, context: RequestContext) -> Self {
        FlowOutcome::Render {
            page,
            status: 200,
            context,
        }
    }
}

/// Request-level failures of the handshake
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A submitted form carried no challenge
    #[error("Missing challenge")]
    MissingChallenge,

    #[error("Unknown challenge")]
    ChallengeNotFound { status: u16 },

    #[error("Challenge expired or already used")]
    ChallengeExpired { status: u16 },

    #[error("Authorization server unavailable: {reason}")]
    ProviderUnavailable { reason: String, timed_out: bool },

    #[error("Authorization server refused the request: {message}")]
    ProviderRejected { status: u16, message: String },

    /// The request body does not offer what the phase needs
    #[error("Malformed form submission: {0}")]
    TypeContractViolation(String),

    #[error("Identity store error: {0}")]
    Identity(String),

    #[error("Rendering error: {0}")]
    Render(String),
}

impl FlowError {
    /// HTTP status answered to the browser
    pub fn status(&self) -> u16 {
        match self {
            FlowError::MissingChallenge => 400,
            FlowError::ChallengeNotFound { status }
            | FlowError::ChallengeExpired { status }
            | FlowError::ProviderRejected { status, .. } => *status,
            FlowError::ProviderUnavailable { timed_out: true, .. } => 504,
            FlowError::ProviderUnavailable { .. } => 502,
            FlowError::TypeContractViolation(_) => 422,
            FlowError::Identity(_) | FlowError::Render(_) => 500,
        }
    }
}

impl From<ProviderError> for FlowError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable { reason, timed_out } => {
                FlowError::ProviderUnavailable { reason, timed_out }
            }
            ProviderError::ChallengeNotFound { status } => FlowError::ChallengeNotFound { status },
            ProviderError::ChallengeExpired { status } => FlowError::ChallengeExpired { status },
            ProviderError::Rejected { status, message } => {
                FlowError::ProviderRejected { status, message }
            }
        }
    }
}

impl From<IdentityError> for FlowError {
    fn from(err: IdentityError) -> Self {
        FlowError::Identity(err.to_string())
    }
}

/// The login, consent and logout handlers
///
/// Holds only immutable, shared state and can serve any number of requests
/// concurrently.
pub struct ChallengeFlow {
    admin: Arc<dyn AdminApi>,
    identity: Arc<dyn IdentityBridge>,
    policy: ConsentPolicy,
    hooks: AuthHooks,
    login_ok_path: String,
}

impl fmt::Debug for ChallengeFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChallengeFlow")
            .field("policy", &self.policy)
            .field("hooks", &self.hooks)
            .field("login_ok_path", &self.login_ok_path)
            .finish()
    }
}

impl ChallengeFlow {
    /// Build the flow
    ///
    /// An [`AcceptLoginHook`] is appended after the caller's hooks so that
    /// host hooks always run before the login challenge is resolved.
    pub fn new(
        admin: Arc<dyn AdminApi>,
        identity: Arc<dyn IdentityBridge>,
        policy: ConsentPolicy,
        hooks: AuthHooks,
        login_ok_path: impl Into<String>,
    ) -> Self {
        let hooks = hooks.with(Arc::new(AcceptLoginHook::new(
            admin.clone(),
            policy.remember_for,
        )));
        Self {
            admin,
            identity,
            policy,
            hooks,
            login_ok_path: login_ok_path.into(),
        }
    }

    pub fn policy(&self) -> &ConsentPolicy {
        &self.policy
    }

    pub fn login_ok_path(&self) -> &str {
        &self.login_ok_path
    }
}
