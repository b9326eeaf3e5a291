//! Weight conventions and liability schedule frequencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PortfolioError;

/// How solved weights are expressed.
///
/// There is no default: every configuration names its convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightConvention {
    /// Weights normalized to sum to one.
    ///
    /// Use when the target is a shape rather than a currency amount.
    Fraction,

    /// Raw least-squares weights, rescaled against prices to a budget.
    Nominal,
}

impl fmt::Display for WeightConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeightConvention::Fraction => "fraction",
            WeightConvention::Nominal => "nominal",
        };
        write!(f, "{name}")
    }
}

/// Spacing of the target liability schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFrequency {
    /// One payment per calendar month.
    #[default]
    Monthly,
    /// One payment per year.
    Annually,
}

impl TargetFrequency {
    /// Months between consecutive target dates.
    #[must_use]
    pub fn months(self) -> i32 {
        match self {
            TargetFrequency::Monthly => 1,
            TargetFrequency::Annually => 12,
        }
    }
}

impl fmt::Display for TargetFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFrequency::Monthly => "monthly",
            TargetFrequency::Annually => "annually",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TargetFrequency {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(TargetFrequency::Monthly),
            "annually" => Ok(TargetFrequency::Annually),
            _ => Err(PortfolioError::InvalidFrequency {
                value: s.to_string(),
            }),
        }
    }
}
