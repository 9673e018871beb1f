//! Notification text formatting.
//!
//! The booking notification carries the slot as `dd/MM/yyyy 'at' HH:mm`
//! (24-hour clock), expressed here as the strftime pattern
//! [`DEFAULT_DATE_FORMAT`]. Both the pattern and the message prefix are
//! configurable.

use std::fmt::Write;

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default date pattern for booking notifications.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y at %H:%M";

/// Default text preceding the formatted date.
pub const DEFAULT_MESSAGE_PREFIX: &str = "New appointment for";

/// Errors raised for an unusable format pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The pattern is empty.
    #[error("date format must not be empty")]
    Empty,
    /// The pattern contains an unknown or malformed specifier.
    #[error("invalid date format: {pattern}")]
    Invalid { pattern: String },
}

/// Formats booking notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationFormat {
    /// strftime pattern for the slot date.
    pub date_format: String,
    /// Text placed before the formatted date.
    pub message_prefix: String,
}

impl Default for NotificationFormat {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
        }
    }
}

impl NotificationFormat {
    /// Builder: set the date pattern.
    #[must_use]
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Builder: set the message prefix.
    #[must_use]
    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = prefix.into();
        self
    }

    /// Checks that the date pattern can be rendered.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.date_format.is_empty() {
            return Err(FormatError::Empty);
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError::Invalid {
                pattern: self.date_format.clone(),
            });
        }
        Ok(())
    }

    /// Renders the slot date.
    ///
    /// Falls back to [`DEFAULT_DATE_FORMAT`] if the configured pattern cannot
    /// be rendered.
    pub fn format_date(&self, date: NaiveDateTime) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_ok() {
            return out;
        }
        date.format(DEFAULT_DATE_FORMAT).to_string()
    }

    /// Renders the full notification message for a booked slot.
    pub fn booking_message(&self, date: NaiveDateTime) -> String {
        format!("{} {}", self.message_prefix, self.format_date(date))
    }
}
