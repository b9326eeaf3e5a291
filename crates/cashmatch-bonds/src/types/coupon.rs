//! Coupon rate units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use cashmatch_core::Frequency;

use crate::error::{BondError, BondResult};

/// Coupon frequency from a payments-per-year count.
///
/// # Errors
///
/// Returns `BondError::InvalidFrequency` unless `periods_per_year` is 1, 2,
/// 4 or 12.
pub fn coupon_frequency(periods_per_year: u32) -> BondResult<Frequency> {
    Frequency::from_periods_per_year(periods_per_year).map_err(|_| BondError::InvalidFrequency {
        value: periods_per_year,
    })
}

/// Unit in which a coupon rate is quoted.
///
/// `Auto` treats values in `[0, 20]` as percentages and anything else as a
/// decimal fraction. A decimal coupon such as `0.05` therefore reads as
/// 0.05%; pass `Decimal` when rates are already fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponUnit {
    /// Guess from magnitude.
    #[default]
    Auto,
    /// Rate is a percentage (`5.0` = 5%).
    Percent,
    /// Rate is a decimal fraction (`0.05` = 5%).
    Decimal,
}

impl CouponUnit {
    /// Converts a quoted rate to a decimal fraction.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidCoupon` if the result is negative or not
    /// finite.
    pub fn normalize(self, rate: f64) -> BondResult<f64> {
        let decimal = match self {
            CouponUnit::Percent => rate / 100.0,
            CouponUnit::Decimal => rate,
            CouponUnit::Auto if (0.0..=20.0).contains(&rate) => rate / 100.0,
            CouponUnit::Auto => rate,
        };

        if !decimal.is_finite() {
            return Err(BondError::InvalidCoupon {
                value: rate,
                reason: "coupon rate must be finite".to_string(),
            });
        }
        if decimal < 0.0 {
            return Err(BondError::InvalidCoupon {
                value: rate,
                reason: "coupon rate must be non-negative".to_string(),
            });
        }
        Ok(decimal)
    }
}

impl fmt::Display for CouponUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CouponUnit::Auto => "auto",
            CouponUnit::Percent => "percent",
            CouponUnit::Decimal => "decimal",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CouponUnit {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(CouponUnit::Auto),
            "percent" | "pct" | "%" => Ok(CouponUnit::Percent),
            "decimal" => Ok(CouponUnit::Decimal),
            other => Err(BondError::Config {
                reason: format!("unknown coupon unit '{other}'"),
            }),
        }
    }
}
