//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Forbidden`] → 403
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Conflict`] → 409
/// - [`ServiceError::Unavailable`] → 503
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request was malformed: missing wallet header, invalid body, or a
    /// value outside the accepted range.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller is not allowed to act on the target record.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The referenced user, portfolio, or favorite does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write would violate a uniqueness constraint.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The record store is temporarily unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }

    /// Message safe to expose to callers. Internal details are replaced.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Internal(_) => "internal error".into(),
            ServiceError::BadRequest(m)
            | ServiceError::Forbidden(m)
            | ServiceError::NotFound(m)
            | ServiceError::Conflict(m)
            | ServiceError::Unavailable(m) => m.clone(),
        }
    }
}
