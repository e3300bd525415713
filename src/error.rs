use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::users::{error::UserError, validate::FieldViolation};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldViolation>,
}

/// Everything a handler can fail with, mapped onto HTTP in `into_response`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed request body: {0}")]
    MalformedInput(String),

    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("invalid user id")]
    InvalidId,

    #[error(transparent)]
    User(#[from] UserError),

    /// Update failures all surface as 500, a missing id included.
    #[error("failed to update user: {0}")]
    UpdateFailed(UserError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, message, details) = match self {
            AppError::MalformedInput(detail) => (
                StatusCode::BAD_REQUEST,
                "Invalid JSON format",
                detail,
                Vec::new(),
            ),
            AppError::Validation(violations) => {
                let summary = violations
                    .iter()
                    .map(|v| format!("{}: {}", v.field, v.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::BAD_REQUEST,
                    "Validation failed",
                    summary,
                    violations,
                )
            }
            AppError::InvalidId => (
                StatusCode::BAD_REQUEST,
                "Invalid user ID",
                "User ID must be a valid number".to_string(),
                Vec::new(),
            ),
            AppError::User(UserError::NotFound) => (
                StatusCode::NOT_FOUND,
                "User not found",
                UserError::NotFound.to_string(),
                Vec::new(),
            ),
            AppError::User(UserError::DuplicateEmail)
            | AppError::UpdateFailed(UserError::DuplicateEmail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Email already exists",
                UserError::DuplicateEmail.to_string(),
                Vec::new(),
            ),
            AppError::UpdateFailed(UserError::NotFound) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update user",
                UserError::NotFound.to_string(),
                Vec::new(),
            ),
            AppError::User(e) | AppError::UpdateFailed(e) => {
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "an internal error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: title.to_string(),
                message,
                details,
            }),
        )
            .into_response()
    }
}
