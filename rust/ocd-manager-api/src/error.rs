//! HTTP error taxonomy.
//!
//! Every handler returns `Result<_, ApiError>`. Ownership mismatches are
//! reported as [`ApiError::NotFound`] so that a caller cannot probe for
//! records belonging to someone else.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::ValidationError;

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request payload failed a validation rule.
    #[error("{0}")]
    Validation(String),

    /// No valid session accompanied the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// Login attempt with an unknown email or a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Record is absent or owned by another user.
    #[error("Not found")]
    NotFound,

    /// Unique constraint violated (duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Credential endpoint throttled.
    #[error("Too many attempts. Please try again later.")]
    RateLimited {
        /// Seconds until the next attempt is allowed.
        retry_after_secs: u64,
    },

    /// Anything unexpected. Detail is logged, never returned.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error body. `error` carries the human-readable message so clients
/// can show it as is; `code` is for programmatic checks.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotFound => "not_found",
            Self::Conflict(_) => "conflict",
            Self::RateLimited { .. } => "rate_limit_exceeded",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "❌ Request failed with internal error");
            }
            Self::Validation(message) => {
                tracing::warn!(message = %message, "⚠️  Validation failed");
            }
            _ => {
                tracing::debug!(status = %status, "Request rejected");
            }
        }

        let retry_after = match &self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let body = Json(ErrorBody {
            error: self.to_string(),
            code: self.code(),
        });
        let mut response = (status, body).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// A malformed record id cannot name an existing record.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Unparseable path parameter");
        Self::NotFound
    }
}
