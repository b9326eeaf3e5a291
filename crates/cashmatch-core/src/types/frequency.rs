//! Coupon frequency.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Coupon payment frequency.
///
/// Only annual, semi-annual, quarterly and monthly coupons are supported.
/// Serializes as the number of periods per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum Frequency {
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year)
    #[default]
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
}

impl Frequency {
    /// Builds a frequency from a periods-per-year count.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFrequency` unless `n` is 1, 2, 4 or 12.
    pub fn from_periods_per_year(n: u32) -> CoreResult<Self> {
        match n {
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            4 => Ok(Frequency::Quarterly),
            12 => Ok(Frequency::Monthly),
            value => Err(CoreError::InvalidFrequency { value }),
        }
    }

    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the number of months per period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl TryFrom<u32> for Frequency {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Frequency::from_periods_per_year(value)
    }
}

impl From<Frequency> for u32 {
    fn from(freq: Frequency) -> Self {
        freq.periods_per_year()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_and_months() {
        for (n, months) in [(1, 12), (2, 6), (4, 3), (12, 1)] {
            let freq = Frequency::from_periods_per_year(n).unwrap();
            assert_eq!(freq.periods_per_year(), n);
            assert_eq!(freq.months_per_period(), months);
        }
    }

    #[test]
    fn test_rejects_unsupported() {
        for n in [0, 3, 6, 52] {
            assert_eq!(
                Frequency::from_periods_per_year(n),
                Err(CoreError::InvalidFrequency { value: n })
            );
        }
    }

    #[test]
    fn test_serde_as_integer() {
        assert_eq!(serde_json::to_string(&Frequency::Quarterly).unwrap(), "4");
        let parsed: Frequency = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, Frequency::Monthly);
        assert!(serde_json::from_str::<Frequency>("3").is_err());
    }
}
