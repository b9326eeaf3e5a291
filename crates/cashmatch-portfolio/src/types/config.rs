//! Configuration for portfolio construction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use cashmatch_bonds::PricingConfig;
use cashmatch_core::Frequency;
use cashmatch_math::linear_algebra::DEFAULT_SINGULAR_THRESHOLD;

use super::WeightConvention;
use crate::error::{PortfolioError, PortfolioResult};

/// Configuration for portfolio construction.
///
/// Controls the weight convention, timeline cleanup, solver conditioning and
/// parallelism. Schedule notional and roll convention come from the embedded
/// [`PricingConfig`].
///
/// `weight_convention` is required; every other field has a default.
///
/// ```toml
/// weight_convention = "fraction"
/// coupon_frequency = 2
/// parallel_threshold = 50
///
/// [pricing]
/// ex_div_business_days = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortfolioConfig {
    /// How solved weights are expressed.
    pub weight_convention: WeightConvention,

    /// Remove timeline rows where every column is zero.
    #[serde(default = "default_true")]
    pub drop_zero_rows: bool,

    /// Reciprocal condition below which `CᵀC` is treated as singular.
    #[serde(default = "default_singular_threshold")]
    pub singular_threshold: f64,

    /// Coupon frequency used to generate bond schedules.
    #[serde(default = "default_coupon_frequency")]
    pub coupon_frequency: Frequency,

    /// Enable parallel processing (requires 'parallel' feature).
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Minimum bond count to trigger parallel schedule generation.
    /// Below this threshold, sequential is faster due to thread overhead.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Schedule and pricing settings.
    #[serde(default)]
    pub pricing: PricingConfig,
}

fn default_true() -> bool {
    true
}

fn default_singular_threshold() -> f64 {
    DEFAULT_SINGULAR_THRESHOLD
}

fn default_coupon_frequency() -> Frequency {
    Frequency::SemiAnnual
}

fn default_parallel_threshold() -> usize {
    100
}

impl PortfolioConfig {
    /// Creates a config for `weight_convention` with default settings.
    #[must_use]
    pub fn new(weight_convention: WeightConvention) -> Self {
        Self {
            weight_convention,
            drop_zero_rows: true,
            singular_threshold: default_singular_threshold(),
            coupon_frequency: default_coupon_frequency(),
            parallel: true,
            parallel_threshold: default_parallel_threshold(), // Use parallel if >=100 bonds
            pricing: PricingConfig::default(),
        }
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential(weight_convention: WeightConvention) -> Self {
        Self {
            parallel: false,
            ..Self::new(weight_convention)
        }
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> PortfolioResult<Self> {
        toml::from_str(content).map_err(|e| PortfolioError::Config {
            reason: e.to_string(),
        })
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> PortfolioResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PortfolioError::Config {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Sets the weight convention.
    #[must_use]
    pub fn with_weight_convention(mut self, convention: WeightConvention) -> Self {
        self.weight_convention = convention;
        self
    }

    /// Sets whether all-zero timeline rows are removed.
    #[must_use]
    pub fn with_drop_zero_rows(mut self, drop: bool) -> Self {
        self.drop_zero_rows = drop;
        self
    }

    /// Sets the singular threshold.
    #[must_use]
    pub fn with_singular_threshold(mut self, threshold: f64) -> Self {
        self.singular_threshold = threshold;
        self
    }

    /// Sets the coupon frequency for generated schedules.
    #[must_use]
    pub fn with_coupon_frequency(mut self, frequency: Frequency) -> Self {
        self.coupon_frequency = frequency;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the pricing configuration.
    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashmatch_core::BusinessDayConvention;

    #[test]
    fn test_new() {
        let config = PortfolioConfig::new(WeightConvention::Nominal);
        assert_eq!(config.weight_convention, WeightConvention::Nominal);
        assert!(config.drop_zero_rows);
        assert_eq!(config.singular_threshold, 1e-14);
        assert_eq!(config.coupon_frequency, Frequency::SemiAnnual);
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, 100);
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn test_sequential() {
        let config = PortfolioConfig::sequential(WeightConvention::Fraction);
        assert!(!config.parallel);
        assert_eq!(config.weight_convention, WeightConvention::Fraction);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PortfolioConfig::new(WeightConvention::Nominal)
            .with_weight_convention(WeightConvention::Fraction)
            .with_drop_zero_rows(false)
            .with_coupon_frequency(Frequency::Annual)
            .with_threshold(50);

        assert_eq!(config.weight_convention, WeightConvention::Fraction);
        assert!(!config.drop_zero_rows);
        assert_eq!(config.coupon_frequency, Frequency::Annual);
        assert_eq!(config.parallel_threshold, 50);
    }

    #[test]
    fn test_should_parallelize() {
        let config = PortfolioConfig::new(WeightConvention::Nominal).with_threshold(100);

        #[cfg(feature = "parallel")]
        {
            assert!(!config.should_parallelize(50));
            assert!(config.should_parallelize(100));
            assert!(config.should_parallelize(500));
        }

        #[cfg(not(feature = "parallel"))]
        {
            assert!(!config.should_parallelize(50));
            assert!(!config.should_parallelize(100));
            assert!(!config.should_parallelize(500));
        }

        assert!(!PortfolioConfig::sequential(WeightConvention::Nominal).should_parallelize(1_000));
    }

    #[test]
    fn test_toml() {
        let config = PortfolioConfig::from_toml_str(
            r#"
            weight_convention = "fraction"
            coupon_frequency = 4
            drop_zero_rows = false

            [pricing]
            ex_div_business_days = 0
            convention = "following"
            "#,
        )
        .unwrap();

        assert_eq!(config.weight_convention, WeightConvention::Fraction);
        assert_eq!(config.coupon_frequency, Frequency::Quarterly);
        assert!(!config.drop_zero_rows);
        assert_eq!(config.pricing.ex_div_business_days, 0);
        assert_eq!(config.pricing.convention, BusinessDayConvention::Following);
        assert_eq!(config.parallel_threshold, 100);
    }

    #[test]
    fn test_toml_rejects_bad_input() {
        assert!(matches!(
            PortfolioConfig::from_toml_str("threshold = 5"),
            Err(PortfolioError::Config { .. })
        ));
        assert!(matches!(
            PortfolioConfig::from_toml_str("weight_convention = \"nominal\"\ncoupon_frequency = 3"),
            Err(PortfolioError::Config { .. })
        ));
    }

    #[test]
    fn test_toml_requires_weight_convention() {
        let err = PortfolioConfig::from_toml_str("coupon_frequency = 2").unwrap_err();
        match err {
            PortfolioError::Config { reason } => assert!(reason.contains("weight_convention")),
            other => panic!("unexpected error: {other:?}"),
        }

        let config = PortfolioConfig::from_toml_str("weight_convention = \"nominal\"").unwrap();
        assert_eq!(config, PortfolioConfig::new(WeightConvention::Nominal));
    }

    #[test]
    fn test_serde() {
        let config = PortfolioConfig::new(WeightConvention::Fraction).with_threshold(75);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: PortfolioConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }
}
