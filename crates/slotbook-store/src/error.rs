//! Error types for collaborator operations.
//!
//! [`StoreError`] covers the appointment store. Its [`StoreErrorCode::Duplicate`]
//! code is the uniqueness-constraint signal the engine turns into a
//! slot-taken rejection; every other code is an infrastructure failure.

use std::fmt;
use thiserror::Error;

/// The category of a store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// The backing store could not be reached or timed out.
    Unavailable,
    /// A write violated the one-appointment-per-slot constraint.
    Duplicate,
    /// A query or record was malformed (e.g. an impossible month).
    InvalidData,
    /// Unexpected internal failure.
    Internal,
}

impl StoreErrorCode {
    /// Returns true if retrying the whole operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "store_unavailable",
            Self::Duplicate => "duplicate",
            Self::InvalidData => "invalid_data",
            Self::Internal => "internal_error",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the appointment store.
#[derive(Debug, Error)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Creates a new store error with the given code and message.
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Unavailable, message)
    }

    /// Creates a uniqueness-violation error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Duplicate, message)
    }

    /// Creates an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidData, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Internal, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if this is a uniqueness-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        self.code == StoreErrorCode::Duplicate
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a notification collaborator.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The delivery channel is down.
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(StoreErrorCode::Unavailable.is_retryable());
        assert!(!StoreErrorCode::Duplicate.is_retryable());
        assert!(!StoreErrorCode::InvalidData.is_retryable());
        assert!(!StoreErrorCode::Internal.is_retryable());
    }

    #[test]
    fn duplicate_is_flagged() {
        let err = StoreError::duplicate("slot pa@2024-03-10T09:00");
        assert!(err.is_duplicate());
        assert_eq!(err.code(), StoreErrorCode::Duplicate);
        assert_eq!(err.message(), "slot pa@2024-03-10T09:00");
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = StoreError::unavailable("connection refused");
        assert_eq!(err.to_string(), "store_unavailable: connection refused");
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = StoreError::internal("write failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
