use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::server::AppState;

/// Extractor that requires a valid admin bearer token.
pub struct RequireAdmin {
    /// Subject of the verified token (the admin username).
    pub subject: String,
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuth => "Authentication required",
            AuthError::InvalidScheme => "Invalid authorization scheme",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        if let Ok(challenge) = "Bearer realm=\"folio\"".parse() {
            response.headers_mut().insert("WWW-Authenticate", challenge);
        }
        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingAuth)?;

        let raw_token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidScheme)?
            .trim();
        if raw_token.is_empty() {
            return Err(AuthError::MissingAuth);
        }

        let subject = state
            .tokens
            .verify(raw_token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(RequireAdmin { subject })
    }
}
