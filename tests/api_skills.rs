//! Skill CRUD and public listing tests.

mod common;

use axum::http::{StatusCode, header::AUTHORIZATION};
use serde_json::{Value, json};

use common::TestContext;

#[tokio::test]
async fn create_applies_defaults() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let response = ctx
        .server
        .post("/api/v1/admin/skills")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "name": "Rust", "category": "Languages" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "Rust");
    assert_eq!(body["data"]["proficiency"], 1);
    assert_eq!(body["data"]["years_experience"], 0.0);
    assert_eq!(body["data"]["has_icon"], false);
}

#[tokio::test]
async fn proficiency_is_bounded() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    for bad in [0, 6] {
        let response = ctx
            .server
            .post("/api/v1/admin/skills")
            .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
            .json(&json!({ "name": "Rust", "category": "Languages", "proficiency": bad }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let response = ctx
        .server
        .post("/api/v1/admin/skills")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "name": "   ", "category": "Languages" }))
        .await;
    // Whitespace-only strings survive the mapping layer but fail validation.
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_listing_filters_by_category() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    ctx.seed_skill(&token, "Rust", "Languages").await;
    ctx.seed_skill(&token, "Go", "Languages").await;
    ctx.seed_skill(&token, "PostgreSQL", "Databases").await;

    let response = ctx.server.get("/api/v1/skills").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let response = ctx.server.get("/api/v1/skills?category=Languages").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Rust"));
    assert!(names.contains(&"Go"));

    let response = ctx.server.get("/api/v1/skills/categories").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"], json!(["Databases", "Languages"]));
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let ctx = TestContext::new();
    let token = ctx.login().await;
    let id = ctx.seed_skill(&token, "Rust", "Languages").await;

    let response = ctx
        .server
        .put(&format!("/api/v1/admin/skills/{id}"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "proficiency": 5 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "Rust");
    assert_eq!(body["data"]["category"], "Languages");
    assert_eq!(body["data"]["proficiency"], 5);
}

#[tokio::test]
async fn delete_removes_the_skill() {
    let ctx = TestContext::new();
    let token = ctx.login().await;
    let id = ctx.seed_skill(&token, "Rust", "Languages").await;

    ctx.server
        .delete(&format!("/api/v1/admin/skills/{id}"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .get(&format!("/api/v1/admin/skills/{id}"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.server
        .delete(&format!("/api/v1/admin/skills/{id}"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn icon_upload_serves_through_the_public_route() {
    let ctx = TestContext::new();
    let token = ctx.login().await;
    let id = ctx.seed_skill(&token, "Rust", "Languages").await;

    let part = axum_test::multipart::Part::bytes(common::PNG_BYTES.to_vec())
        .file_name("rust.png")
        .mime_type("image/png");
    let form = axum_test::multipart::MultipartForm::new().add_part("file", part);

    ctx.server
        .post(&format!("/api/v1/admin/skills/{id}/icon"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .multipart(form)
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx.server.get(&format!("/api/v1/images/skills/{id}")).await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/png"
    );

    ctx.server
        .delete(&format!("/api/v1/admin/skills/{id}/icon"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .get(&format!("/api/v1/images/skills/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
