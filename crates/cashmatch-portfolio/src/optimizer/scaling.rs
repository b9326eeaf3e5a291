//! Budget scaling of nominal weights.

use serde::Serialize;

use crate::error::{PortfolioError, PortfolioResult};

/// Nominal weights rescaled so their cost equals a budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetScaling {
    /// `budget / Σ(weight × price)`.
    pub scale: f64,
    /// `Σ(weight × price)` before scaling.
    pub unscaled_cost: f64,
    /// `weight × scale` per bond.
    pub scaled_weights: Vec<f64>,
    /// `scaled_weight × price` per bond.
    pub value_invested: Vec<f64>,
}

impl BudgetScaling {
    /// Sum of value invested.
    pub fn total_invested(&self) -> f64 {
        self.value_invested.iter().sum()
    }
}

/// Scales nominal weights so that `Σ(scaled_weight × price) = budget`.
///
/// # Errors
///
/// Returns `PortfolioError::DimensionMismatch` if the slices differ in
/// length and `PortfolioError::InvalidPortfolio` if the unscaled cost is not
/// a positive finite number.
pub fn scale_to_budget(weights: &[f64], prices: &[f64], budget: f64) -> PortfolioResult<BudgetScaling> {
    if weights.len() != prices.len() {
        return Err(PortfolioError::dimension_mismatch(
            "prices",
            weights.len(),
            prices.len(),
        ));
    }

    let unscaled_cost: f64 = weights.iter().zip(prices).map(|(w, p)| w * p).sum();
    if !unscaled_cost.is_finite() || unscaled_cost <= 0.0 {
        return Err(PortfolioError::invalid_portfolio(format!(
            "total cost of weights must be positive, got {unscaled_cost}"
        )));
    }

    let scale = budget / unscaled_cost;
    let scaled_weights: Vec<f64> = weights.iter().map(|w| w * scale).collect();
    let value_invested = scaled_weights.iter().zip(prices).map(|(w, p)| w * p).collect();

    Ok(BudgetScaling {
        scale,
        unscaled_cost,
        scaled_weights,
        value_invested,
    })
}
