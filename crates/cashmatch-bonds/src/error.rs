//! Error types for bond operations.

use thiserror::Error;

use cashmatch_core::{CoreError, Date};
use cashmatch_math::MathError;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur while building schedules or pricing bonds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Instrument is not a bond or is missing required terms.
    #[error("Invalid instrument {id}: {reason}")]
    InvalidInstrument {
        /// Instrument identifier.
        id: String,
        /// Description of what's invalid.
        reason: String,
    },

    /// Coupon frequency is not 1, 2, 4 or 12.
    #[error("Invalid coupon frequency: {value} (expected 1, 2, 4 or 12)")]
    InvalidFrequency {
        /// The rejected periods-per-year value.
        value: u32,
    },

    /// Coupon rate is negative or not finite.
    #[error("Invalid coupon rate {value}: {reason}")]
    InvalidCoupon {
        /// The rejected rate.
        value: f64,
        /// Reason for invalidity.
        reason: String,
    },

    /// Stub or coupon anchor dates fall outside the bond's life.
    #[error("Invalid schedule bounds: {reason}")]
    InvalidScheduleBounds {
        /// Description of the violated bound.
        reason: String,
    },

    /// Yield makes the compounding factor non-positive.
    #[error("Invalid yield {value}: {reason}")]
    InvalidYield {
        /// The rejected yield.
        value: f64,
        /// Reason for invalidity.
        reason: String,
    },

    /// No sign change found while searching for the yield.
    #[error(
        "Could not bracket yield for clean price {clean_price} at {settlement} \
         ({evaluated} anchors evaluated)"
    )]
    YieldNotBracketed {
        /// Clean price being matched.
        clean_price: f64,
        /// Settlement date.
        settlement: Date,
        /// Number of anchor yields that priced successfully.
        evaluated: usize,
    },

    /// Internal schedule construction invariant violated.
    #[error("Schedule invariant violated: {reason}")]
    ScheduleInvariant {
        /// Description of the violation.
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration error.
        reason: String,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Numerical error.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl BondError {
    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid schedule bounds error.
    #[must_use]
    pub fn invalid_bounds(reason: impl Into<String>) -> Self {
        Self::InvalidScheduleBounds {
            reason: reason.into(),
        }
    }

    /// Creates a schedule invariant error.
    #[must_use]
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::ScheduleInvariant {
            reason: reason.into(),
        }
    }
}
