//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by dates, frequencies and calendars.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date construction or arithmetic.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Coupon frequency outside the supported set.
    #[error("Invalid frequency: {value} (expected one of 1, 2, 4, 12)")]
    InvalidFrequency {
        /// The rejected periods-per-year value.
        value: u32,
    },

    /// Unknown business day convention code.
    #[error("Invalid business day convention: '{code}'")]
    InvalidConvention {
        /// The rejected code.
        code: String,
    },

    /// Calendar construction or loading error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar_error(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }
}
