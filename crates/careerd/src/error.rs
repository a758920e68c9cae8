//! HTTP error mapping for the career API.
//!
//! Everything a handler can fail with becomes an `ApiError`, which renders
//! as the uniform `{"success": false, "message": ...}` envelope. Conflicts
//! surface as 400 like validation failures; only true internals are 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use career_common::{ApiResponse, CareerError};
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl From<CareerError> for ApiError {
    fn from(e: CareerError) -> Self {
        match e {
            CareerError::Validation(msg) | CareerError::Conflict(msg) => {
                Self::new(StatusCode::BAD_REQUEST, msg)
            }
            CareerError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            other => {
                error!("Request failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}
