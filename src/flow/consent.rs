// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use log::{debug, info};
use serde_json::{Map, Value};

use super::{
    Challenge, ChallengeFlow, ChallengeValues, ConsentValues, FlowError, FlowOutcome, Page,
    Redirection, RememberValues, RequestContext,
};
use crate::policy::{build_grant, resolve_audience, should_skip_consent, ConsentOrigin};
use crate::provider::RejectRequest;
use crate::session::SessionStore;

impl ChallengeFlow {
    /// GET /consent
    ///
    /// Skippable or whitelisted requests are granted right away with the
    /// scope and audience the client requested.
    pub async fn consent_show(
        &self,
        challenge: Option<&str>,
        session: &dyn SessionStore,
    ) -> Result<FlowOutcome, FlowError> {
        let Some(challenge) = challenge.and_then(Challenge::new) else {
            return Ok(FlowOutcome::Deferred);
        };

        let record = self.admin.get_consent_request(challenge.as_str()).await?;

        if should_skip_consent(&record, &self.policy.whitelist) {
            info!(
                "Consent of {} granted without prompt for {}",
                record.subject, record.request_url
            );
            let audience = resolve_audience(
                &record,
                &[],
                self.policy.override_requested_audience,
                ConsentOrigin::Automatic,
            );
            let grant = build_grant(
                &record,
                record.requested_scope.clone(),
                audience,
                self.session_payload(session).await,
                None,
            );
            let completed = self
                .admin
                .accept_consent_request(challenge.as_str(), &grant)
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
        let context = RequestContext::new(&challenge)
            .with("context", record.context.unwrap_or(Value::Null))
            .with("login_session_id", record.login_session_id)
            .with("request_url", record.request_url)
            .with("requested_audience", record.requested_access_token_audience)
            .with("requested_scope", record.requested_scope)
            .with("subject", record.subject)
            .with("client", client);

        Ok(FlowOutcome::render(Page::Consent, context))
    }

    /// POST /consent
    ///
    /// A denial is resolved without reading the challenge again. An approval
    /// re-fetches the challenge to get the audience the provider actually
    /// recorded.
    pub async fn consent_submit<F>(
        &self,
        form: &F,
        session: &dyn SessionStore,
    ) -> Result<FlowOutcome, FlowError>
    where
        F: ChallengeValues + ConsentValues + RememberValues + Sync,
    {
        let challenge = Challenge::new(form.challenge()).ok_or(FlowError::MissingChallenge)?;

        if !form.is_allowed() {
            info!("Consent denied for challenge {}", challenge);
            let completed = self
                .admin
                .reject_consent_request(challenge.as_str(), &RejectRequest::access_denied())
                .await?;
            return Ok(FlowOutcome::Redirect(Redirection::found(
                completed.redirect_to,
            )));
        }

        let record = self.admin.get_consent_request(challenge.as_str()).await?;
        let audience = resolve_audience(
            &record,
            form.requested_audience(),
            self.policy.override_requested_audience,
            ConsentOrigin::UserSubmission,
        );
        let remember = self.policy.remember(form.should_remember());
        let grant = build_grant(
            &record,
            form.granted_scopes().to_vec(),
            audience,
            self.session_payload(session).await,
            Some(remember),
        );

        info!(
            "Consent granted by {} for scopes {:?}",
            record.subject, grant.grant_scope
        );
        let completed = self
            .admin
            .accept_consent_request(challenge.as_str(), &grant)
            .await?;
        Ok(FlowOutcome::Redirect(Redirection::found(
            completed.redirect_to,
        )))
    }

    async fn session_payload(&self, session: &dyn SessionStore) -> Map<String, Value> {
        match self.identity.current_user(session).await {
            Some(user) => user.session_payload(),
            None => {
                debug!("No logged-in user, granting with an empty session");
                Map::new()
            }
        }
    }
}
