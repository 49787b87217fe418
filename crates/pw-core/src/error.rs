//! # AppError
//!
//! Centralized error handling for Pinwall.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all pw-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Post, Comment, User)
    #[error("{0} not found: {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., text too long, missing field)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Missing, invalid or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to touch the target.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Infrastructure failure (e.g., DB down, hashing failure)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Resource already exists (e.g., duplicate username)
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn not_found(kind: &str, key: impl ToString) -> Self {
        AppError::NotFound(kind.to_string(), key.to_string())
    }
}

/// A specialized Result type for Pinwall logic.
pub type Result<T> = std::result::Result<T, AppError>;
