//! Shared test harness: an in-process server backed by a throwaway data
//! directory, plus helpers for logging in and seeding records over the API.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;

use folio::auth::TokenService;
use folio::blob::BlobStorage;
use folio::config::AppConfig;
use folio::server::{AppState, create_router};
use folio::store::{SqliteStore, Store};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// A tiny but valid PNG (1x1, opaque).
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

pub struct TestContext {
    pub server: TestServer,
    _data_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let data_dir = TempDir::new().expect("create temp dir");

        let config = AppConfig {
            data_dir: data_dir.path().to_path_buf(),
            jwt_secret: "test-signing-secret".to_string(),
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            ..AppConfig::default()
        };

        let store = SqliteStore::new(config.db_path()).expect("open store");
        store.initialize().expect("initialize schema");

        let blobs = BlobStorage::new(&config.data_dir);
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_minutes);

        let state = Arc::new(AppState {
            store: Arc::new(store),
            blobs,
            tokens,
            config,
        });

        let server = TestServer::new(create_router(state)).expect("start test server");

        Self {
            server,
            _data_dir: data_dir,
        }
    }

    pub async fn login(&self) -> String {
        let response = self
            .server
            .post("/api/v1/auth/login")
            .json(&json!({
                "username": ADMIN_USERNAME,
                "password": ADMIN_PASSWORD,
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        body["data"]["access_token"]
            .as_str()
            .expect("access token in login response")
            .to_string()
    }

    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Creates a skill over the admin API and returns its id.
    pub async fn seed_skill(&self, token: &str, name: &str, category: &str) -> i64 {
        let response = self
            .server
            .post("/api/v1/admin/skills")
            .add_header(
                axum::http::header::AUTHORIZATION,
                Self::auth_header_value(token),
            )
            .json(&json!({ "name": name, "category": category, "proficiency": 3 }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        body["data"]["id"].as_i64().expect("skill id")
    }

    /// Creates a project over the admin API and returns its id.
    pub async fn seed_project(&self, token: &str, name: &str) -> i64 {
        let response = self
            .server
            .post("/api/v1/admin/projects")
            .add_header(
                axum::http::header::AUTHORIZATION,
                Self::auth_header_value(token),
            )
            .json(&json!({ "name": name, "description": "A test project" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        body["data"]["id"].as_i64().expect("project id")
    }
}
