// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

mod common;

use common::{
    client_for, client_with, completed, location, login, mount_get, post_form, requests_path,
    test_config,
};
use rocket::http::Status;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REQUEST_URL: &str = "https://auth.example.org/oauth2/auth?client_id=app";

fn consent_record(skip: bool) -> Value {
    json!({
        "challenge": "c1",
        "skip": skip,
        "subject": "alice",
        "requested_scope": ["openid", "profile"],
        "requested_access_token_audience": ["api1"],
        "client": {"client_id": "app", "client_name": "Example App"},
        "request_url": REQUEST_URL,
        "login_session_id": "ls-1"
    })
}

async fn mount_accept(server: &MockServer, body: Value) {
    Mock::given(method("PUT"))
        .and(path(requests_path("consent") + "/accept"))
        .and(query_param("consent_challenge", "c1"))
        .and(body_json(body))
        .respond_with(completed("https://auth.example.org/granted"))
        .expect(1)
        .mount(server)
        .await;
}

#[rocket::async_test]
async fn test_consent_without_challenge_is_deferred() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let response = client.get("/consent").dispatch().await;
    assert_eq!(response.status(), Status::NoContent);
}

#[rocket::async_test]
async fn test_consent_page_is_rendered() {
    let server = MockServer::start().await;
    mount_get(&server, "consent", "c1", consent_record(false)).await;
    let client = client_for(&server).await;

    let response = client.get("/consent?consent_challenge=c1").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap();
    assert!(html.contains(r#"name="challenge" value="c1""#));
    assert!(html.contains(r#"name="scopes" value="openid""#));
    assert!(html.contains(r#"name="scopes" value="profile""#));
    assert!(html.contains(r#"name="requestedAudience" value="api1""#));
}

#[rocket::async_test]
async fn test_skipped_consent_grants_requested_access() {
    let server = MockServer::start().await;
    mount_get(&server, "consent", "c1", consent_record(true)).await;
    mount_accept(
        &server,
        json!({
            "grant_scope": ["openid", "profile"],
            "grant_access_token_audience": ["api1"],
            "session": {}
        }),
    )
    .await;
    let client = client_for(&server).await;

    let response = client.get("/consent?consent_challenge=c1").dispatch().await;
    assert_eq!(response.status(), Status::Found);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://auth.example.org/granted")
    );
}

#[rocket::async_test]
async fn test_whitelisted_client_carries_user_claims() {
    let server = MockServer::start().await;
    mount_get(&server, "consent", "c1", consent_record(false)).await;
    mount_accept(
        &server,
        json!({
            "grant_scope": ["openid", "profile"],
            "grant_access_token_audience": ["api1"],
            "session": {"id_token": {"email": "alice@example.org", "name": "Alice Liddell"}}
        }),
    )
    .await;
    let mut config = test_config(&server.uri());
    config.consent.whitelist = vec![REQUEST_URL.to_string()];
    let client = client_with(config).await;
    login(&client, &server).await;

    let response = client.get("/consent?consent_challenge=c1").dispatch().await;
    assert_eq!(response.status(), Status::Found);
}

#[rocket::async_test]
async fn test_allowed_consent_grants_checked_scopes() {
    let server = MockServer::start().await;
    mount_get(&server, "consent", "c1", consent_record(false)).await;
    mount_accept(
        &server,
        json!({
            "grant_scope": ["openid"],
            "grant_access_token_audience": ["api1"],
            "session": {"id_token": {"email": "alice@example.org", "name": "Alice Liddell"}},
            "remember": true,
            "remember_for": 3600
        }),
    )
    .await;
    let client = client_for(&server).await;
    login(&client, &server).await;

    let response = post_form(
        &client,
        "/consent",
        "challenge=c1&isAllowed=true&scopes=openid&requestedAudience=forged&remember=true",
    )
    .await;
    assert_eq!(response.status(), Status::Found);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://auth.example.org/granted")
    );
}

#[rocket::async_test]
async fn test_audience_override_uses_submitted_audience() {
    let server = MockServer::start().await;
    mount_get(&server, "consent", "c1", consent_record(false)).await;
    mount_accept(
        &server,
        json!({
            "grant_scope": ["openid", "profile"],
            "grant_access_token_audience": ["api2", "api3"],
            "session": {},
            "remember": false,
            "remember_for": 3600
        }),
    )
    .await;
    let mut config = test_config(&server.uri());
    config.consent.override_requested_audience = true;
    let client = client_with(config).await;

    let response = post_form(
        &client,
        "/consent",
        "challenge=c1&isAllowed=true&scopes=openid&scopes=profile&requestedAudience=api2&requestedAudience=api3",
    )
    .await;
    assert_eq!(response.status(), Status::Found);
}

#[rocket::async_test]
async fn test_bracketed_field_names_are_decoded() {
    let server = MockServer::start().await;
    mount_get(&server, "consent", "c1", consent_record(false)).await;
    mount_accept(
        &server,
        json!({
            "grant_scope": ["openid", "profile"],
            "grant_access_token_audience": ["api2"],
            "session": {},
            "remember": false,
            "remember_for": 3600
        }),
    )
    .await;
    let mut config = test_config(&server.uri());
    config.consent.override_requested_audience = true;
    let client = client_with(config).await;

    let response = post_form(
        &client,
        "/consent",
        "challenge=c1&isAllowed=true&scopes%5B%5D=openid&scopes%5B%5D=profile&requestedAudience%5B%5D=api2",
    )
    .await;
    assert_eq!(response.status(), Status::Found);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://auth.example.org/granted")
    );
}

#[rocket::async_test]
async fn test_denied_consent_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(requests_path("consent") + "/reject"))
        .and(query_param("consent_challenge", "c1"))
        .and(body_json(json!({
            "error": "access_denied",
            "error_description": "The resource owner denied the request"
        })))
        .respond_with(completed("https://app.example.org/cb?error=access_denied"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(requests_path("consent") + "/accept"))
        .respond_with(completed("https://auth.example.org/granted"))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let response = post_form(&client, "/consent", "challenge=c1&isAllowed=false&scopes=openid").await;
    assert_eq!(response.status(), Status::Found);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://app.example.org/cb?error=access_denied")
    );
}

#[rocket::async_test]
async fn test_used_challenge_is_not_granted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(requests_path("consent")))
        .and(query_param("consent_challenge", "c1"))
        .respond_with(ResponseTemplate::new(410).set_body_json(json!({
            "redirect_to": "https://auth.example.org/oauth2/fallbacks/error"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(requests_path("consent") + "/accept"))
        .respond_with(completed("https://auth.example.org/granted"))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server).await;

    let response = client.get("/consent?consent_challenge=c1").dispatch().await;
    assert_eq!(response.status(), Status::Gone);

    let response = post_form(&client, "/consent", "challenge=c1&isAllowed=true&scopes=openid").await;
    assert_eq!(response.status(), Status::Gone);
}

#[rocket::async_test]
async fn test_consent_submit_without_challenge() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let response = post_form(&client, "/consent", "isAllowed=true&scopes=openid").await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = post_form(&client, "/consent", "challenge=c1&isAllowed=maybe").await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}
