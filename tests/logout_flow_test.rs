// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the hydra-consent project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

mod common;

use common::{client_for, completed, location, login, mount_get, post_form, requests_path};
use rocket::http::Status;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer};

fn logout_record() -> Value {
    json!({
        "request_url": "https://auth.example.org/oauth2/sessions/logout",
        "rp_initiated": true,
        "sid": "sid-1",
        "subject": "alice"
    })
}

#[rocket::async_test]
async fn test_logout_page_is_rendered() {
    let server = MockServer::start().await;
    mount_get(&server, "logout", "l1", logout_record()).await;
    let client = client_for(&server).await;

    let response = client.get("/logout").dispatch().await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client.get("/logout?logout_challenge=l1").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap();
    assert!(html.contains(r#"name="challenge" value="l1""#));
    assert!(html.contains("alice"));
}

#[rocket::async_test]
async fn test_confirmed_logout_clears_session() {
    let server = MockServer::start().await;
    mount_get(&server, "logout", "l1", logout_record()).await;
    Mock::given(method("PUT"))
        .and(path(requests_path("logout") + "/accept"))
        .and(query_param("logout_challenge", "l1"))
        .respond_with(completed("https://app.example.org/bye"))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    login(&client, &server).await;
    assert!(client.cookies().get_private("uid").is_some());

    let response = post_form(&client, "/logout", "challenge=l1&shouldLogout=true").await;
    assert_eq!(response.status(), Status::TemporaryRedirect);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://app.example.org/bye")
    );
    drop(response);
    assert!(client.cookies().get_private("uid").is_none());
}

#[rocket::async_test]
async fn test_declined_logout_keeps_session_and_flashes_notice() {
    let server = MockServer::start().await;
    mount_get(&server, "logout", "l2", logout_record()).await;
    Mock::given(method("PUT"))
        .and(path(requests_path("logout") + "/reject"))
        .and(query_param("logout_challenge", "l1"))
        .respond_with(completed("https://app.example.org/still-here"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(requests_path("logout") + "/accept"))
        .respond_with(completed("https://app.example.org/bye"))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server).await;
    login(&client, &server).await;

    let response = post_form(&client, "/logout", "challenge=l1&shouldLogout=false").await;
    assert_eq!(response.status(), Status::TemporaryRedirect);
    assert_eq!(
        location(&response).as_deref(),
        Some("https://app.example.org/still-here")
    );
    drop(response);
    assert!(client.cookies().get_private("uid").is_some());

    // The notice is shown once on the next page
    let html = client
        .get("/logout?logout_challenge=l2")
        .dispatch()
        .await
        .into_string()
        .await
        .unwrap();
    assert!(html.contains("You are being redirected away"));
    let html = client
        .get("/logout?logout_challenge=l2")
        .dispatch()
        .await
        .into_string()
        .await
        .unwrap();
    assert!(!html.contains("You are being redirected away"));
}

#[rocket::async_test]
async fn test_stale_logout_challenge_keeps_session() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    login(&client, &server).await;

    // The logout request is unknown to the provider
    let response = post_form(&client, "/logout", "challenge=gone&shouldLogout=true").await;
    assert_eq!(response.status(), Status::NotFound);
    drop(response);
    assert!(client.cookies().get_private("uid").is_some());
}
