use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::Error;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

/// API error that converts to a proper HTTP response
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "data": null, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Maps the domain error taxonomy onto HTTP statuses. Storage-level detail
/// never reaches the client; it is logged and collapsed to a 500.
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound => Self::not_found("Resource not found"),
            Error::Validation(message) => Self::bad_request(message),
            Error::Authentication => Self::unauthorized("Authentication required"),
            Error::Authorization => Self {
                status: StatusCode::FORBIDDEN,
                message: "Access denied".to_string(),
            },
            Error::SingletonViolation(entity) => {
                Self::conflict(format!("{entity} record already exists"))
            }
            Error::Conflict(message) => Self::conflict(message),
            Error::File(message) => Self::bad_request(message),
            other => {
                tracing::error!("internal error: {other}");
                Self::internal("Internal server error")
            }
        }
    }
}

/// Extension for Option types from store operations.
pub trait StoreOptionExt<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found(message))
    }
}
