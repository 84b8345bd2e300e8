//! HTTP-facing error taxonomy. Every handler returns `Result<_, AppError>`;
//! `IntoResponse` maps each variant to the status code and stable error
//! code string from the error handling design.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use mdm_crypto::token::TokenError;
use mdm_db::DbError;
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authentication failed")]
    AuthFailure,

    #[error("device token has been revoked")]
    TokenRevoked,

    #[error("validation failed: {0}")]
    ValidationFailure(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("retry later")]
    Backpressure { retry_after_secs: u64 },

    #[error("rate limited")]
    RateLimited { retry_after_secs: u64 },

    #[error("upstream dependency failed: {0}")]
    UpstreamFailure(String),

    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::AuthFailure => "auth_failure",
            AppError::TokenRevoked => "token_revoked",
            AppError::ValidationFailure(_) => "validation_failure",
            AppError::PayloadTooLarge => "payload_too_large",
            AppError::NotFound => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Backpressure { .. } => "backpressure",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::UpstreamFailure(_) => "upstream_failure",
            AppError::DataIntegrity(_) => "data_integrity",
            AppError::Db(db) if db.is_not_found() => "not_found",
            AppError::Db(_) => "data_integrity",
            AppError::Token(_) => "auth_failure",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::AuthFailure => StatusCode::UNAUTHORIZED,
            AppError::TokenRevoked => StatusCode::GONE,
            AppError::ValidationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Backpressure { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::DataIntegrity(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Db(db) if db.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn retry_after(&self) -> Option<u64> {
        match self {
            AppError::Backpressure { retry_after_secs } | AppError::RateLimited { retry_after_secs } => {
                Some(*retry_after_secs)
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let mut response = (
            status,
            Json(ErrorBody {
                error: self.code(),
                message: self.to_string(),
            }),
        )
            .into_response();

        if let Some(secs) = self.retry_after() {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
