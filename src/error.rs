//! Error types and Axum response conversions.

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::storage::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types.
///
/// Client errors are rendered as `{ "status": "fail", "message": .. }`,
/// server errors as `{ "status": "error", "message": .. }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Internal(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Internal server error");
                "Something went wrong.".to_string()
            }
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                msg
            }
        };

        let kind = if status.is_client_error() {
            "fail"
        } else {
            "error"
        };

        let body = Json(json!({
            "status": kind,
            "message": message
        }));

        (status, body).into_response()
    }
}

// Convenience conversions from lower-level error types
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(format!("Store error: {}", err))
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(format!("Password hashing error: {}", err))
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => {
                AppError::Unauthorized("Your token has expired. Please log in again.".to_string())
            }
            TokenError::Invalid(_) => {
                AppError::Unauthorized("Invalid token. Please log in again.".to_string())
            }
            TokenError::MissingSecret | TokenError::Signing(_) => {
                AppError::Internal(format!("Token error: {}", err))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", err.body_text()))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}
