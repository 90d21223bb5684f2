// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Form bodies posted by the login, consent and logout pages
//!
//! A missing `challenge` decodes to an empty string so the flow can answer
//! with its own missing-challenge error. Unchecked checkboxes are simply
//! absent and decode to `false`.

use rocket::form::FromForm;

use crate::flow::{
    ChallengeValues, ConsentValues, CredentialValues, LogoutValues, RedirectValues,
    RememberValues,
};

#[derive(FromForm, Debug, Clone)]
pub struct LoginForm {
    #[field(default = String::new())]
    pub challenge: String,
    pub username: String,
    pub password: String,
    #[field(default = false)]
    pub remember: bool,
    /// Local path to land on after login
    pub redir: Option<String>,
}

#[derive(FromForm, Debug, Clone)]
pub struct ConsentForm {
    #[field(default = String::new())]
    pub challenge: String,
    #[field(name = "isAllowed")]
    #[field(default = false)]
    pub is_allowed: bool,
    /// Checked scopes, sent as repeated `scopes` (or `scopes[]`) fields
    pub scopes: Vec<String>,
    #[field(name = "requestedAudience")]
    pub requested_audience: Vec<String>,
    #[field(default = false)]
    pub remember: bool,
}

#[derive(FromForm, Debug, Clone)]
pub struct LogoutForm {
    #[field(default = String::new())]
    pub challenge: String,
    #[field(name = "shouldLogout")]
    #[field(default = false)]
    pub should_logout: bool,
}

impl ChallengeValues for LoginForm {
    fn challenge(&self) -> &str {
        &self.challenge
    }
}

impl CredentialValues for LoginForm {
    fn pid(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }
}

impl RememberValues for LoginForm {
    fn should_remember(&self) -> bool {
        self.remember
    }
}

impl RedirectValues for LoginForm {
    fn redirect_override(&self) -> Option<&str> {
        self.redir.as_deref().filter(|redir| !redir.is_empty())
    }
}

impl ChallengeValues for ConsentForm {
    fn challenge(&self) -> &str {
        &self.challenge
    }
}

impl ConsentValues for ConsentForm {
    fn is_allowed(&self) -> bool {
        self.is_allowed
    }

    fn granted_scopes(&self) -> &[String] {
        &self.scopes
    }

    fn requested_audience(&self) -> &[String] {
        &self.requested_audience
    }
}

impl RememberValues for ConsentForm {
    fn should_remember(&self) -> bool {
        self.remember
    }
}

impl ChallengeValues for LogoutForm {
    fn challenge(&self) -> &str {
        &self.challenge
    }
}

impl LogoutValues for LogoutForm {
    fn should_logout(&self) -> bool {
        self.should_logout
    }
}
