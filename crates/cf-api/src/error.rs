//! Maps the domain error taxonomy onto HTTP responses.
//!
//! Every business-rule failure is a 400 with a machine-readable `code`
//! matching the rule name; the 401/403/404 distinctions carry through from
//! the policy and lookup layers untouched.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use cf_core::error::AppError;
use serde_json::json;
use std::fmt;

/// Newtype so `ResponseError` can be implemented for the core error here.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Business-rule violations are client errors.
            AppError::Validation(_)
            | AppError::QuotaExceeded
            | AppError::DuplicateSkill
            | AppError::DuplicateInterest
            | AppError::ProjectFull
            | AppError::AlreadyHandled => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match &self.0 {
            AppError::Internal(inner) => {
                // Infrastructure details stay in the log, not on the wire.
                log::error!("internal error: {inner}");
                "internal service error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({
            "code": self.0.code(),
            "detail": detail,
        }))
    }
}
