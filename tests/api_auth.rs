//! Login and access-gate tests.

mod common;

use axum::http::{StatusCode, header::AUTHORIZATION};
use serde_json::{Value, json};

use common::TestContext;

#[tokio::test]
async fn login_returns_bearer_token() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/v1/auth/login")
        .json(&json!({
            "username": common::ADMIN_USERNAME,
            "password": common::ADMIN_PASSWORD,
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["error"].is_null());
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["expires_in"], 3600);
    assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/v1/auth/login")
        .json(&json!({
            "username": common::ADMIN_USERNAME,
            "password": "nope",
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn login_rejects_unknown_username() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/v1/auth/login")
        .json(&json!({
            "username": "somebody",
            "password": common::ADMIN_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/v1/admin/skills").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert!(body["data"].is_null());
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn admin_routes_reject_garbage_tokens() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/v1/admin/skills")
        .add_header(AUTHORIZATION, "Bearer not-a-token")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_non_bearer_schemes() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/v1/admin/skills")
        .add_header(AUTHORIZATION, "Basic YWRtaW46c2VjcmV0")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_grants_admin_access() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let response = ctx
        .server
        .get("/api/v1/admin/skills")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let ctx = TestContext::new();

    ctx.server.get("/health").await.assert_status_ok();
    ctx.server.get("/api/v1/portfolio").await.assert_status_ok();
    ctx.server.get("/api/v1/projects").await.assert_status_ok();
}
