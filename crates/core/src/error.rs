//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a deterministic, business-level failure. A command that
/// returns one of these has emitted no events. Infrastructure concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The caller supplied structurally invalid input (empty id, non-positive
    /// quantity, empty currency, negative amount, arithmetic overflow).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The command is not permitted in the aggregate's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A referenced resource (line item, aggregate) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Monetary arithmetic attempted across differing currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn currency_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = DomainError::currency_mismatch("BRL", "USD");
        assert_eq!(err.to_string(), "currency mismatch: BRL vs USD");

        let err = DomainError::invalid_state("order is confirmed");
        assert_eq!(err.to_string(), "invalid state: order is confirmed");
    }
}
