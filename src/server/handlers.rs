// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Routes of the login, consent and logout pages
//!
//! Handlers only adapt HTTP to [`ChallengeFlow`]: read the challenge or the
//! form, hand the cookie jar over as session store and turn the outcome into
//! a response.

use rocket::form::{Errors, Form};
use rocket::http::CookieJar;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::serde::json::{json, Json, Value};
use rocket::{catch, get, post, Request, State};

use super::forms::{ConsentForm, LoginForm, LogoutForm};
use super::responses::FlowResponse;
use crate::flow::{ChallengeFlow, FlowError};
use crate::views::Views;

type FlowResult = Result<FlowResponse, FlowError>;

fn notice_of(flash: Option<FlashMessage<'_>>) -> Option<String> {
    flash.map(|flash| flash.message().to_string())
}

fn form_value<T>(form: Result<Form<T>, Errors<'_>>) -> Result<T, FlowError> {
    form.map(Form::into_inner)
        .map_err(|errors| FlowError::TypeContractViolation(errors.to_string()))
}

/// # Login page
#[get("/login?<login_challenge>&<redir>")]
pub async fn login_show(
    login_challenge: Option<String>,
    redir: Option<String>,
    flow: &State<ChallengeFlow>,
    views: &State<Views>,
    flash: Option<FlashMessage<'_>>,
) -> FlowResult {
    let outcome = flow
        .login_show(login_challenge.as_deref(), redir.as_deref())
        .await?;
    FlowResponse::from_outcome(views, outcome, notice_of(flash))
}

#[post("/login", data = "<form>")]
pub async fn login_submit(
    form: Result<Form<LoginForm>, Errors<'_>>,
    flow: &State<ChallengeFlow>,
    views: &State<Views>,
    cookies: &CookieJar<'_>,
) -> FlowResult {
    let form = form_value(form)?;
    let outcome = flow.login_submit(&form, cookies).await?;
    FlowResponse::from_outcome(views, outcome, None)
}

/// # Consent page
#[get("/consent?<consent_challenge>")]
pub async fn consent_show(
    consent_challenge: Option<String>,
    flow: &State<ChallengeFlow>,
    views: &State<Views>,
    cookies: &CookieJar<'_>,
    flash: Option<FlashMessage<'_>>,
) -> FlowResult {
    let outcome = flow
        .consent_show(consent_challenge.as_deref(), cookies)
        .await?;
    FlowResponse::from_outcome(views, outcome, notice_of(flash))
}

#[post("/consent", data = "<form>")]
pub async fn consent_submit(
    form: Result<Form<ConsentForm>, Errors<'_>>,
    flow: &State<ChallengeFlow>,
    views: &State<Views>,
    cookies: &CookieJar<'_>,
) -> FlowResult {
    let form = form_value(form)?;
    let outcome = flow.consent_submit(&form, cookies).await?;
    FlowResponse::from_outcome(views, outcome, None)
}

/// # Logout page
#[get("/logout?<logout_challenge>")]
pub async fn logout_show(
    logout_challenge: Option<String>,
    flow: &State<ChallengeFlow>,
    views: &State<Views>,
    flash: Option<FlashMessage<'_>>,
) -> FlowResult {
    let outcome = flow.logout_show(logout_challenge.as_deref()).await?;
    FlowResponse::from_outcome(views, outcome, notice_of(flash))
}

#[post("/logout", data = "<form>")]
pub async fn logout_submit(
    form: Result<Form<LogoutForm>, Errors<'_>>,
    flow: &State<ChallengeFlow>,
    views: &State<Views>,
    cookies: &CookieJar<'_>,
) -> FlowResult {
    let form = form_value(form)?;
    let outcome = flow.logout_submit(&form, cookies).await?;
    FlowResponse::from_outcome(views, outcome, None)
}

/// Liveness probe
#[get("/health")]
pub fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Unknown routes get the error page instead of Rocket's default body
#[catch(404)]
pub fn not_found(request: &Request<'_>) -> RawHtml<String> {
    let message = format!("No page at {}", request.uri().path());
    let html = request
        .rocket()
        .state::<Views>()
        .and_then(|views| views.render_error(404, &message).ok())
        .unwrap_or(message);
    RawHtml(html)
}
