// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication hooks
//!
//! Host applications can observe or take over a login through [`AuthHook`]
//! implementations registered in an [`AuthHooks`] list. Hooks run in
//! registration order; the first one answering [`HookFlow::Handled`] ends the
//! phase and its outcome becomes the response.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::{Challenge, FlowError, FlowOutcome, Redirection};
use crate::provider::{AcceptLogin, AdminApi};
use crate::session::Principal;

/// What a hook decided
#[derive(Debug)]
pub enum HookFlow {
    /// Let the next hook (or the default behaviour) run
    Continue,
    /// Stop here and answer with this outcome
    Handled(FlowOutcome),
}

/// Login attempt seen by the hooks
pub struct AuthEvent<'a> {
    pub challenge: &'a Challenge,
    pub principal: &'a dyn Principal,
    pub remember: bool,
    /// Local path the login form asked to land on, already checked
    pub redirect_override: Option<&'a str>,
}

#[async_trait]
pub trait AuthHook: Send + Sync {
    /// Credentials are valid, the session is not written yet
    async fn before_auth(&self, _event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        Ok(HookFlow::Continue)
    }

    /// The principal id is stored in the session
    async fn after_auth(&self, _event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        Ok(HookFlow::Continue)
    }

    /// The password did not match
    async fn auth_failed(&self, _event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        Ok(HookFlow::Continue)
    }
}

#[derive(Debug, Clone, Copy)]
enum HookPhase {
    Before,
    After,
    Failed,
}

/// Ordered list of [`AuthHook`]s
#[derive(Clone, Default)]
pub struct AuthHooks {
    hooks: Vec<Arc<dyn AuthHook>>,
}

impl fmt::Debug for AuthHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHooks")
            .field("registered", &self.hooks.len())
            .finish()
    }
}

impl AuthHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn AuthHook>) {
        self.hooks.push(hook);
    }

    pub fn with(mut self, hook: Arc<dyn AuthHook>) -> Self {
        self.register(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn before_auth(&self, event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        self.fire(HookPhase::Before, event).await
    }

    pub async fn after_auth(&self, event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        self.fire(HookPhase::After, event).await
    }

    pub async fn auth_failed(&self, event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        self.fire(HookPhase::Failed, event).await
    }

    async fn fire(&self, phase: HookPhase, event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        for (index, hook) in self.hooks.iter().enumerate() {
            let flow = match phase {
                HookPhase::Before => hook.before_auth(event).await?,
                HookPhase::After => hook.after_auth(event).await?,
                HookPhase::Failed => hook.auth_failed(event).await?,
            };
            if let HookFlow::Handled(_) = flow {
                debug!("{:?} hook #{} handled the login", phase, index);
                return Ok(flow);
            }
        }
        Ok(HookFlow::Continue)
    }
}

/// Resolves the login challenge once the user is authenticated
///
/// Always registered last by [`ChallengeFlow::new`](super::ChallengeFlow::new).
pub struct AcceptLoginHook {
    admin: Arc<dyn AdminApi>,
    remember_for: i64,
}

impl AcceptLoginHook {
    pub fn new(admin: Arc<dyn AdminApi>, remember_for: i64) -> Self {
        Self {
            admin,
            remember_for,
        }
    }
}

#[async_trait]
impl AuthHook for AcceptLoginHook {
    async fn after_auth(&self, event: &AuthEvent<'_>) -> Result<HookFlow, FlowError> {
        let body = AcceptLogin {
            subject: event.principal.pid().to_string(),
            remember: Some(event.remember),
            remember_for: Some(self.remember_for),
        };
        let completed = self
            .admin
            .accept_login_request(event.challenge.as_str(), &body)
            .await?;

        let location = match event.redirect_override {
            Some(local) => local.to_string(),
            None => completed.redirect_to,
        };
        Ok(HookFlow::Handled(FlowOutcome::Redirect(Redirection::found(
            location,
        ))))
    }
}
