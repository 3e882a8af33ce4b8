//! Shared error taxonomy for the workflow core.
//!
//! State-mutation failures surface to the caller with a specific kind; the
//! HTTP layer maps `wire_code()` onto its response vocabulary. Side-effect
//! failures (notifications, activity log) never reach this type; they are
//! caught and logged inside the outbox worker.

use thiserror::Error;

/// Result alias used by all domain actions.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by domain actions.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    /// Stable machine-readable code, mapped by the transport layer.
    pub fn wire_code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_failed",
            DomainError::Unauthorized => "unauthorized",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidState(_) => "invalid_state",
            DomainError::Internal(_) => "internal_error",
        }
    }

    /// Shorthand for a `NotFound` about a named entity.
    pub fn not_found(entity: &str) -> Self {
        DomainError::NotFound(entity.to_string())
    }

    /// Shorthand for an `InvalidState` with a reason.
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        DomainError::InvalidState(reason.into())
    }

    /// Shorthand for a `Forbidden` with a reason.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        DomainError::Forbidden(reason.into())
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("record".to_string()),
            other => DomainError::Internal(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes_are_stable() {
        assert_eq!(
            DomainError::Validation("x".into()).wire_code(),
            "validation_failed"
        );
        assert_eq!(DomainError::Unauthorized.wire_code(), "unauthorized");
        assert_eq!(DomainError::forbidden("x").wire_code(), "forbidden");
        assert_eq!(DomainError::not_found("quote").wire_code(), "not_found");
        assert_eq!(DomainError::invalid_state("x").wire_code(), "invalid_state");
        assert_eq!(
            DomainError::Internal(anyhow::anyhow!("boom")).wire_code(),
            "internal_error"
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DomainError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.wire_code(), "not_found");
    }
}
