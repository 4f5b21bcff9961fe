use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::dto::{LoginRequest, LoginResponse};
use crate::server::response::{ApiError, ApiResponse};

/// Exchanges admin credentials for a bearer token. Wrong username and wrong
/// password get the same answer.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if req.username != state.config.admin_username || req.password != state.config.admin_password {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let (access_token, expires_in) = state.tokens.issue(&req.username).map_err(ApiError::from)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in,
    })))
}
