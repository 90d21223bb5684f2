// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! HTTP client for the provider admin API
//!
//! [`AdminClient`] wraps the login, consent and logout request endpoints of
//! the provider. Each operation is a single HTTP round trip bounded by the
//! client timeout. Nothing is retried here: accept and reject are not
//! idempotent, so an outcome that is unknown (for example after a timeout)
//! is reported to the caller as [`ProviderError::Unavailable`].

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::error::ProviderError;
use super::types::{
    AcceptLogin, CompletedRequest, ConsentRequest, GrantDecision, LoginRequest, LogoutRequest,
    RejectRequest,
};

/// Default timeout of an admin API round trip
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const REQUESTS_PATH: &str = "oauth2/auth/requests";

/// Handshake phase a challenge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Login,
    Consent,
    Logout,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Login => "login",
            Phase::Consent => "consent",
            Phase::Logout => "logout",
        }
    }

    /// Name of the query parameter carrying the challenge of this phase
    pub fn challenge_param(self) -> &'static str {
        match self {
            Phase::Login => "login_challenge",
            Phase::Consent => "consent_challenge",
            Phase::Logout => "logout_challenge",
        }
    }
}

/// Administrative operations the handshake needs from the provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn get_login_request(&self, challenge: &str) -> Result<LoginRequest, ProviderError>;

    async fn accept_login_request(
        &self,
        challenge: &str,
        body: &AcceptLogin,
    ) -> Result<CompletedRequest, ProviderError>;

    async fn get_consent_request(&self, challenge: &str) -> Result<ConsentRequest, ProviderError>;

    async fn accept_consent_request(
        &self,
        challenge: &str,
        body: &GrantDecision,
    ) -> Result<CompletedRequest, ProviderError>;

    async fn reject_consent_request(
        &self,
        challenge: &str,
        body: &RejectRequest,
    ) -> Result<CompletedRequest, ProviderError>;

    async fn get_logout_request(&self, challenge: &str) -> Result<LogoutRequest, ProviderError>;

    async fn accept_logout_request(&self, challenge: &str)
        -> Result<CompletedRequest, ProviderError>;

    async fn reject_logout_request(&self, challenge: &str)
        -> Result<CompletedRequest, ProviderError>;
}

/// reqwest based implementation of [`AdminApi`]
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http: reqwest::Client,
}

impl AdminClient {
    /// Create a client for the admin API rooted at `base_url`
    ///
    /// ### Errors
    ///
    /// Returns [`ProviderError::Unavailable`] when `base_url` is not an
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let parsed = Url::parse(base_url).map_err(|e| ProviderError::Unavailable {
            reason: format!("invalid admin URL '{}': {}", base_url, e),
            timed_out: false,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderError::Unavailable {
                reason: format!("admin URL '{}' must use http or https", base_url),
                timed_out: false,
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            // The admin API answers with JSON; a redirect here is a misconfiguration
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(ProviderError::from_transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, phase: Phase, action: Option<&str>) -> String {
        match action {
            Some(action) => format!(
                "{}/{}/{}/{}",
                self.base_url,
                REQUESTS_PATH,
                phase.as_str(),
                action
            ),
            None => format!("{}/{}/{}", self.base_url, REQUESTS_PATH, phase.as_str()),
        }
    }

    async fn call<B, T>(
        &self,
        method: Method,
        phase: Phase,
        action: Option<&str>,
        challenge: &str,
        body: Option<&B>,
    ) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(phase, action);
        debug!("{} {} ({})", method, url, phase.challenge_param());

        let mut request = self
            .http
            .request(method, &url)
            .query(&[(phase.challenge_param(), challenge)]);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("Admin API call to {} failed: {}", url, e);
            ProviderError::from_transport(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ProviderError::from_transport)?;
        if !status.is_success() {
            warn!("Admin API answered {} for {}", status, url);
            return Err(ProviderError::from_status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ProviderError::Unavailable {
            reason: format!("malformed response from {}: {}", url, e),
            timed_out: false,
        })
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn get_login_request(&self, challenge: &str) -> Result<LoginRequest, ProviderError> {
        self.call::<(), _>(Method::GET, Phase::Login, None, challenge, None)
            .await
    }

    async fn accept_login_request(
        &self,
        challenge: &str,
        body: &AcceptLogin,
    ) -> Result<CompletedRequest, ProviderError> {
        self.call(Method::PUT, Phase::Login, Some("accept"), challenge, Some(body))
            .await
    }

    async fn get_consent_request(&self, challenge: &str) -> Result<ConsentRequest, ProviderError> {
        self.call::<(), _>(Method::GET, Phase::Consent, None, challenge, None)
            .await
    }

    async fn accept_consent_request(
        &self,
        challenge: &str,
        body: &GrantDecision,
    ) -> Result<CompletedRequest, ProviderError> {
        self.call(Method::PUT, Phase::Consent, Some("accept"), challenge, Some(body))
            .await
    }

    async fn reject_consent_request(
        &self,
        challenge: &str,
        body: &RejectRequest,
    ) -> Result<CompletedRequest, ProviderError> {
        self.call(Method::PUT, Phase::Consent, Some("reject"), challenge, Some(body))
            .await
    }

    async fn get_logout_request(&self, challenge: &str) -> Result<LogoutRequest, ProviderError> {
        self.call::<(), _>(Method::GET, Phase::Logout, None, challenge, None)
            .await
    }

    async fn accept_logout_request(
        &self,
        challenge: &str,
    ) -> Result<CompletedRequest, ProviderError> {
        self.call::<(), _>(Method::PUT, Phase::Logout, Some("accept"), challenge, None)
            .await
    }

    async fn reject_logout_request(
        &self,
        challenge: &str,
    ) -> Result<CompletedRequest, ProviderError> {
        self.call::<(), _>(Method::PUT, Phase::Logout, Some("reject"), challenge, None)
            .await
    }
}
