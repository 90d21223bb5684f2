// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use log::{debug, info};
use serde_json::Value;

use super::forms::safe_local_redirect;
use super::{
    AuthEvent, Challenge, ChallengeFlow, ChallengeValues, CredentialValues, FlowError,
    FlowOutcome, HookFlow, Page, Redirection, RedirectValues, RememberValues, RequestContext,
    INVALID_CREDENTIALS,
};
use crate::provider::AcceptLogin;
use crate::session::{IdentityError, SessionStore, SESSION_KEY};

impl ChallengeFlow {
    /// GET /login
    ///
    /// `redir` is carried into the form as the post-login destination when it
    /// is a local path.
    pub async fn login_show(
        &self,
        challenge: Option<&str>,
        redir: Option<&str>,
    ) -> Result<FlowOutcome, FlowError> {
        let Some(challenge) = challenge.and_then(Challenge::new) else {
            return Ok(FlowOutcome::Deferred);
        };

        let record = self.admin.get_login_request(challenge.as_str()).await?;

        if record.skip {
            info!(
                "Login of {} skipped, provider already authenticated the subject",
                record.subject
            );
            let completed = self
                .admin
                .accept_login_request(challenge.as_str(), &AcceptLogin::subject(&record.subject))
                .await?;
            return Ok(FlowOutcome::Redirect(Redirection::found(
                completed.redirect_to,
            )));
        }

        let client = record
            .client
            .as_ref()
            .map(|c| c.to_view())
            .unwrap_or(Value::Null);
        let mut context = RequestContext::new(&challenge)
            .with("request_url", record.request_url)
            .with("requested_audience", record.requested_access_token_audience)
            .with("requested_scope", record.requested_scope)
            .with("session_id", record.session_id)
            .with("subject", record.subject)
            .with("client", client)
            .with("oidc_context", record.oidc_context.unwrap_or(Value::Null));
        if let Some(raw) = redir {
            match safe_local_redirect(raw) {
                Some(path) => context = context.with("redir", path),
                None => debug!("Ignoring non-local redirect {:?}", raw),
            }
        }

        Ok(FlowOutcome::render(Page::Login, context))
    }

    /// POST /login
    ///
    /// Bad credentials re-render the login form with the same challenge and
    /// never touch the provider, so the user can try again.
    pub async fn login_submit<F>(
        &self,
        form: &F,
        session: &dyn SessionStore,
    ) -> Result<FlowOutcome, FlowError>
    where
        F: ChallengeValues + CredentialValues + RememberValues + RedirectValues + Sync,
    {
        let challenge = Challenge::new(form.challenge()).ok_or(FlowError::MissingChallenge)?;
        let redirect_override = form.redirect_override().and_then(safe_local_redirect);

        let principal = match self.identity.load_user_by_pid(form.pid()).await {
            Ok(principal) => principal,
            Err(IdentityError::NotFound(pid)) => {
                info!("Login failed, unknown user {}", pid);
                return Ok(invalid_credentials(&challenge, form.pid(), redirect_override));
            }
            Err(e) => return Err(e.into()),
        };

        let event = AuthEvent {
            challenge: &challenge,
            principal: principal.as_ref(),
            remember: form.should_remember(),
            redirect_override,
        };

        if !self
            .identity
            .verify_password(principal.as_ref(), form.password())
            .await
        {
            info!("Login failed for {}: wrong password", principal.pid());
            if let HookFlow::Handled(outcome) = self.hooks.auth_failed(&event).await? {
                return Ok(outcome);
            }
            return Ok(invalid_credentials(&challenge, form.pid(), redirect_override));
        }

        if let HookFlow::Handled(outcome) = self.hooks.before_auth(&event).await? {
            return Ok(outcome);
        }

        session.put(SESSION_KEY, principal.pid());
        info!("User {} logged in", principal.pid());

        if let HookFlow::Handled(outcome) = self.hooks.after_auth(&event).await? {
            return Ok(outcome);
        }

        let location = redirect_override.unwrap_or(self.login_ok_path.as_str());
        debug!("No hook resolved the login, redirecting to {}", location);
        Ok(FlowOutcome::Redirect(Redirection::temporary(location)))
    }
}

fn invalid_credentials(challenge: &Challenge, username: &str, redir: Option<&str>) -> FlowOutcome {
    let mut context = RequestContext::new(challenge)
        .with("error", INVALID_CREDENTIALS)
        .with("username", username);
    if let Some(redir) = redir {
        context = context.with("redir", redir);
    }
    FlowOutcome::render(Page::Login, context)
}
