//! # AppError
//!
//! Centralized error handling for the Crewfinder ecosystem.
//! Every variant except `Internal` is a client/business error: raised at the
//! point of violation, surfaced directly, never retried.

use thiserror::Error;

/// The primary error type for all cf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// No valid principal for an operation requiring one (401).
    #[error("authentication credentials were not provided")]
    Unauthenticated,

    /// Principal authenticated but not authorized for the target (403).
    #[error("you do not have permission to perform this action")]
    Forbidden,

    /// Referenced entity does not exist, or is not associated with the
    /// caller in the way the operation requires (404).
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed or otherwise invalid input (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Skill-count cap reached (400).
    #[error("maximum of 3 skills allowed per user")]
    QuotaExceeded,

    /// The (user, skill) association already exists (400).
    #[error("this skill has already been added to your profile")]
    DuplicateSkill,

    /// The (user, project) interest already exists, whatever its status (400).
    #[error("you have already expressed interest in this project")]
    DuplicateInterest,

    /// Capacity exhausted at expression or acceptance time (400).
    #[error("no seats available for this project")]
    ProjectFull,

    /// Attempted transition out of a terminal negotiation state (400).
    #[error("this interest has already been handled")]
    AlreadyHandled,

    /// Infrastructure failure (e.g. the database is unreachable).
    #[error("internal service error: {0}")]
    Internal(String),
}

/// Users can hold at most this many skills at any time.
pub const MAX_SKILLS_PER_USER: usize = 3;

impl AppError {
    /// Stable machine-readable code, matching the business-rule name.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "not_authenticated",
            AppError::Forbidden => "permission_denied",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "invalid",
            AppError::QuotaExceeded => "max_skills_exceeded",
            AppError::DuplicateSkill => "duplicate_skill",
            AppError::DuplicateInterest => "interest_already_expressed",
            AppError::ProjectFull => "project_full",
            AppError::AlreadyHandled => "interest_already_handled",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// A specialized Result type for Crewfinder logic.
pub type Result<T> = std::result::Result<T, AppError>;
