//! Education and certification tests.

mod common;

use axum::http::{StatusCode, header::AUTHORIZATION};
use serde_json::{Value, json};

use common::TestContext;

async fn seed_education(ctx: &TestContext, token: &str, body: Value) -> Value {
    let response = ctx
        .server
        .post("/api/v1/admin/education")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"].clone()
}

#[tokio::test]
async fn create_defaults_to_a_degree() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let created = seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "MIT",
            "degree_title": "BSc Computer Science",
            "start_date": "2015-09",
        }),
    )
    .await;

    assert_eq!(created["institution_name"], "MIT");
    assert_eq!(created["degree_title"], "BSc Computer Science");
    assert_eq!(created["education_type"], "degree");
    assert_eq!(created["is_certification"], false);
}

#[tokio::test]
async fn certification_type_sets_the_flag() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let created = seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "CNCF",
            "degree_title": "CKA",
            "education_type": "certification",
            "start_date": "2022-03",
        }),
    )
    .await;

    assert_eq!(created["education_type"], "certification");
    assert_eq!(created["is_certification"], true);
}

#[tokio::test]
async fn public_listing_filters_by_type() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "MIT",
            "degree_title": "BSc",
            "start_date": "2015-09",
            "end_date": "2019-06",
        }),
    )
    .await;
    seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "CNCF",
            "degree_title": "CKA",
            "education_type": "certification",
            "start_date": "2022-03",
        }),
    )
    .await;

    let response = ctx.server.get("/api/v1/education?type=degree").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["institution_name"], "MIT");

    let response = ctx.server.get("/api/v1/education?type=certification").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["degree_title"], "CKA");

    ctx.server
        .get("/api/v1/education?type=bootcamp")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn in_progress_entries_sort_first() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "MIT",
            "degree_title": "BSc",
            "start_date": "2015-09",
            "end_date": "2019-06",
        }),
    )
    .await;
    seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "Stanford",
            "degree_title": "MSc",
            "start_date": "2023-09",
            "is_current": true,
        }),
    )
    .await;

    let response = ctx.server.get("/api/v1/education").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries[0]["institution_name"], "Stanford");
    assert_eq!(entries[1]["institution_name"], "MIT");
}

#[tokio::test]
async fn current_entries_cannot_carry_an_end_date() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let response = ctx
        .server
        .post("/api/v1/admin/education")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({
            "institution_name": "MIT",
            "degree_title": "BSc",
            "start_date": "2015-09",
            "end_date": "2019-06",
            "is_current": true,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patching_current_and_end_date_together_is_rejected() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let created = seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "MIT",
            "degree_title": "BSc",
            "start_date": "2015-09",
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = ctx
        .server
        .put(&format!("/api/v1/admin/education/{id}"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "is_current": true, "end_date": "2019-06" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn certificate_accepts_pdf_uploads() {
    let ctx = TestContext::new();
    let token = ctx.login().await;

    let created = seed_education(
        &ctx,
        &token,
        json!({
            "institution_name": "CNCF",
            "degree_title": "CKA",
            "education_type": "certification",
            "start_date": "2022-03",
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let pdf = b"%PDF-1.4 minimal".to_vec();
    let part = axum_test::multipart::Part::bytes(pdf.clone())
        .file_name("cka.pdf")
        .mime_type("application/pdf");
    let form = axum_test::multipart::MultipartForm::new().add_part("file", part);

    ctx.server
        .post(&format!("/api/v1/admin/education/{id}/certificate"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .multipart(form)
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .get(&format!("/api/v1/documents/certificates/{id}"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );

    // A PDF is not acceptable as an institution logo.
    let part = axum_test::multipart::Part::bytes(pdf)
        .file_name("cka.pdf")
        .mime_type("application/pdf");
    let form = axum_test::multipart::MultipartForm::new().add_part("file", part);
    ctx.server
        .post(&format!("/api/v1/admin/education/{id}/logo"))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .multipart(form)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
