// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use log::info;

use super::{
    Challenge, ChallengeFlow, ChallengeValues, FlowError, FlowOutcome, LogoutValues, Page,
    Redirection, RequestContext, LOGGED_OUT_NOTICE, LOGOUT_DECLINED_NOTICE,
};
use crate::session::SessionStore;

impl ChallengeFlow {
    /// GET /logout
    pub async fn logout_show(&self, challenge: Option<&str>) -> Result<FlowOutcome, FlowError> {
        let Some(challenge) = challenge.and_then(Challenge::new) else {
            return Ok(FlowOutcome::Deferred);
        };

        let record = self.admin.get_logout_request(challenge.as_str()).await?;
        let context = RequestContext::new(&challenge)
            .with("request_url", record.request_url)
            .with("session_id", record.sid)
            .with("subject", record.subject)
            .with("rp_initiated", record.rp_initiated);

        Ok(FlowOutcome::render(Page::Logout, context))
    }

    /// POST /logout
    ///
    /// The local session is only cleared once the provider confirmed the
    /// challenge is still live.
    pub async fn logout_submit<F>(
        &self,
        form: &F,
        session: &dyn SessionStore,
    ) -> Result<FlowOutcome, FlowError>
    where
        F: ChallengeValues + LogoutValues + Sync,
    {
        let challenge = Challenge::new(form.challenge()).ok_or(FlowError::MissingChallenge)?;

        if !form.should_logout() {
            let completed = self
                .admin
                .reject_logout_request(challenge.as_str())
                .await?;
            return Ok(FlowOutcome::Redirect(
                Redirection::temporary(completed.redirect_to).with_notice(LOGOUT_DECLINED_NOTICE),
            ));
        }

        let record = self.admin.get_logout_request(challenge.as_str()).await?;

        let who = match self.identity.current_user(session).await {
            Some(user) => user.pid().to_string(),
            None => record.subject.clone(),
        };
        info!("Logging out {} (sid {})", who, record.sid);
        session.clear();

        let completed = self
            .admin
            .accept_logout_request(challenge.as_str())
            .await?;
        Ok(FlowOutcome::Redirect(
            Redirection::temporary(completed.redirect_to).with_notice(LOGGED_OUT_NOTICE),
        ))
    }
}
