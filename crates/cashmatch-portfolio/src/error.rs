//! Error types for portfolio construction.
//!
//! This module defines the error types used throughout the portfolio crate.

use thiserror::Error;

use cashmatch_bonds::BondError;
use cashmatch_core::{CoreError, Date};
use cashmatch_math::MathError;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur during portfolio operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// No usable bonds, or a portfolio that cannot be costed.
    #[error("Invalid portfolio: {reason}")]
    InvalidPortfolio {
        /// The reason the portfolio is invalid.
        reason: String,
    },

    /// Target schedule frequency other than monthly or annually.
    #[error("Invalid target frequency '{value}': expected 'monthly' or 'annually'")]
    InvalidFrequency {
        /// The rejected value.
        value: String,
    },

    /// Unified timeline is empty once dates on or before settlement are removed.
    #[error("No cashflow dates after settlement date {settlement}")]
    NoDatesAfterSettlement {
        /// The settlement date used as the filter.
        settlement: Date,
    },

    /// No price available for a selected bond.
    #[error("No price for '{instrument_id}' as of {as_of}")]
    MissingPrice {
        /// Instrument without a price.
        instrument_id: String,
        /// Pricing date.
        as_of: Date,
    },

    /// Matrix, vector or table sizes disagree.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Where the mismatch was found.
        context: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {reason}")]
    Config {
        /// The reason the configuration was rejected.
        reason: String,
    },

    /// Schedule generation or pricing failed.
    #[error(transparent)]
    Bond(#[from] BondError),

    /// Linear algebra failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Date or calendar failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PortfolioError {
    /// Creates an invalid portfolio error.
    #[must_use]
    pub fn invalid_portfolio(reason: impl Into<String>) -> Self {
        Self::InvalidPortfolio {
            reason: reason.into(),
        }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
