// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Shared helpers: a Rocket client wired to a wiremock admin API

#![allow(dead_code)]

use std::sync::Once;

use hydra_consent::config::{Config, User};
use hydra_consent::server::{build_rocket, figment_from_config};
use hydra_consent::session::encode_password_hash;
use rocket::config::LogLevel;
use rocket::http::ContentType;
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

pub const PASSWORD: &str = "wonderland";

pub fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Configuration with a single user `alice` pointing at `admin_url`
pub fn test_config(admin_url: &str) -> Config {
    let mut config = Config::default();
    config.provider.admin_url = admin_url.to_string();
    config.provider.timeout = 2;
    config.access.users = vec![User {
        user: "alice".to_string(),
        pass: encode_password_hash(PASSWORD).unwrap(),
        email: Some("alice@example.org".to_string()),
        name: Some("Alice Liddell".to_string()),
    }];
    config
}

pub async fn client_with(config: Config) -> Client {
    setup();
    let figment = figment_from_config(&config, LogLevel::Off);
    let rocket = build_rocket(figment, &config).expect("valid rocket");
    Client::tracked(rocket).await.expect("valid rocket instance")
}

pub async fn client_for(server: &MockServer) -> Client {
    client_with(test_config(&server.uri())).await
}

pub async fn post_form<'c>(client: &'c Client, uri: &'c str, body: &str) -> LocalResponse<'c> {
    client
        .post(uri)
        .header(ContentType::Form)
        .body(body.to_string())
        .dispatch()
        .await
}

pub fn requests_path(phase: &str) -> String {
    format!("/oauth2/auth/requests/{}", phase)
}

/// Answer `GET /oauth2/auth/requests/<phase>?<phase>_challenge=<challenge>`
pub async fn mount_get(server: &MockServer, phase: &str, challenge: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(requests_path(phase)))
        .and(query_param(format!("{}_challenge", phase), challenge))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn completed(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "redirect_to": location }))
}

pub fn location<'c>(response: &LocalResponse<'c>) -> Option<String> {
    response
        .headers()
        .get_one("Location")
        .map(|location| location.to_string())
}

/// Log `alice` in through the login form so the tracked client carries the
/// session cookie
pub async fn login(client: &Client, server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path(requests_path("login") + "/accept"))
        .and(query_param("login_challenge", "setup-login"))
        .respond_with(completed("https://auth.example.org/after-login"))
        .mount(server)
        .await;

    let response = post_form(
        client,
        "/login",
        &format!("challenge=setup-login&username=alice&password={}", PASSWORD),
    )
    .await;
    assert_eq!(response.status().code, 302);
}
