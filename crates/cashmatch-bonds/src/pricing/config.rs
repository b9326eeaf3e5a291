//! Pricing configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cashmatch_core::BusinessDayConvention;

use crate::error::{BondError, BondResult};
use crate::types::CouponUnit;

/// Settings shared by schedule building, accrual and yield solving.
///
/// Loadable from TOML; omitted keys take their defaults.
///
/// ```toml
/// ex_div_business_days = 7
/// tolerance = 1e-10
/// convention = "modified_following"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Business days before payment that a bond goes ex-dividend.
    #[serde(default = "default_ex_div_days")]
    pub ex_div_business_days: i32,

    /// Absolute price tolerance for the yield solver.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Bisection iteration budget.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Expansion steps allowed when widening a caller-supplied bracket.
    #[serde(default = "default_max_bracket_expansions")]
    pub max_bracket_expansions: u32,

    /// Roll convention for coupon payment dates.
    #[serde(default = "default_convention")]
    pub convention: BusinessDayConvention,

    /// Face amount per bond.
    #[serde(default = "default_notional")]
    pub notional: f64,

    /// Unit of quoted coupon rates.
    #[serde(default)]
    pub coupon_unit: CouponUnit,
}

fn default_ex_div_days() -> i32 {
    7
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> u32 {
    200
}

fn default_max_bracket_expansions() -> u32 {
    12
}

fn default_convention() -> BusinessDayConvention {
    BusinessDayConvention::ModifiedFollowing
}

fn default_notional() -> f64 {
    100.0
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ex_div_business_days: default_ex_div_days(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            max_bracket_expansions: default_max_bracket_expansions(),
            convention: default_convention(),
            notional: default_notional(),
            coupon_unit: CouponUnit::Auto,
        }
    }
}

impl PricingConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> BondResult<Self> {
        toml::from_str(content).map_err(|e| BondError::Config {
            reason: e.to_string(),
        })
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> BondResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BondError::Config {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Sets the ex-dividend period.
    #[must_use]
    pub fn with_ex_div_business_days(mut self, days: i32) -> Self {
        self.ex_div_business_days = days;
        self
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the payment date convention.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Sets the coupon unit.
    #[must_use]
    pub fn with_coupon_unit(mut self, unit: CouponUnit) -> Self {
        self.coupon_unit = unit;
        self
    }
}
