//! Engine error types.

use thiserror::Error;

use slotbook_core::RejectionReason;
use slotbook_store::StoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors returned by the booking and availability services.
///
/// Rejections are user-facing and final for the given request. Store
/// failures are internal and the whole operation may be retried.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A booking rule refused the request.
    #[error("{0}")]
    Rejected(#[from] RejectionReason),

    /// The appointment store failed.
    #[error("appointment store failed: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The requested day does not exist.
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The requested month does not exist.
    #[error("invalid month: {year:04}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

impl EngineError {
    /// Creates an invalid date error.
    pub fn invalid_date(year: i32, month: u32, day: u32) -> Self {
        Self::InvalidDate { year, month, day }
    }

    /// Creates an invalid month error.
    pub fn invalid_month(year: i32, month: u32) -> Self {
        Self::InvalidMonth { year, month }
    }

    /// Returns the rejection reason, if this is a validation rejection.
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Returns true if this is a validation rejection.
    pub fn is_rejection(&self) -> bool {
        self.rejection().is_some()
    }

    /// Returns true if retrying the unchanged request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Stable machine-readable code for calling layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(reason) => reason.code(),
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvalidMonth { .. } => "invalid_month",
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Internal failures collapse to a generic text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(reason) => reason.message().to_string(),
            Self::StoreUnavailable(_) => "An internal error occurred, please try again".to_string(),
            Self::InvalidDate { .. } | Self::InvalidMonth { .. } => self.to_string(),
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err)
    }
}
