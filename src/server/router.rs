use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::post;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::public::public_router;
use super::session;
use crate::auth::TokenService;
use crate::blob::BlobStorage;
use crate::config::AppConfig;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub blobs: BlobStorage,
    pub tokens: TokenService,
    pub config: AppConfig,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Batches carry several files, so the body cap is a multiple of the
    // per-file limit plus multipart framing headroom.
    let body_limit = state.config.max_upload_bytes * 12 + 64 * 1024;

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/login", post(session::login))
        .nest("/api/v1/admin", admin_router())
        .nest("/api/v1", public_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
