//! Least-squares weights with explicit conventions.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use cashmatch_math::linear_algebra::{solve_normal_equations, SolveMethod};

use crate::error::{PortfolioError, PortfolioResult};
use crate::types::WeightConvention;

/// How the weights were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveDiagnostics {
    /// Direct normal-equation solve or SVD fallback.
    pub method: SolveMethod,
    /// Numerical rank of `C`.
    pub rank: usize,
    /// `min(rows, cols)` of `C`.
    pub max_rank: usize,
    /// `‖C·w − Y‖₂` before any normalization.
    pub residual_norm: f64,
}

/// Solved weights, one per bond column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSolution {
    /// Weights in the requested convention.
    pub weights: Vec<f64>,
    /// Convention the weights are expressed in.
    pub convention: WeightConvention,
    /// Solver details.
    pub diagnostics: SolveDiagnostics,
}

/// Solves `min ‖C·w − Y‖²` and expresses `w` in `convention`.
///
/// A singular `CᵀC` is handled by a minimum-norm least-squares fallback and
/// reported in the diagnostics rather than as an error.
///
/// # Errors
///
/// Returns `PortfolioError::Math` for empty or mismatched inputs, and
/// `PortfolioError::InvalidPortfolio` if fraction weights cannot be
/// normalized because they sum to zero.
///
/// # Example
///
/// ```rust
/// use cashmatch_portfolio::optimizer::solve_portfolio_weights;
/// use cashmatch_portfolio::types::WeightConvention;
/// use nalgebra::{DMatrix, DVector};
///
/// let c = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
/// let y = DVector::from_vec(vec![1.0, 2.0]);
///
/// let nominal = solve_portfolio_weights(&c, &y, WeightConvention::Nominal, 1e-14).unwrap();
/// assert_eq!(nominal.weights, vec![1.0, 1.0]);
///
/// let fraction = solve_portfolio_weights(&c, &y, WeightConvention::Fraction, 1e-14).unwrap();
/// assert_eq!(fraction.weights, vec![0.5, 0.5]);
/// ```
pub fn solve_portfolio_weights(
    c: &DMatrix<f64>,
    y: &DVector<f64>,
    convention: WeightConvention,
    singular_threshold: f64,
) -> PortfolioResult<WeightSolution> {
    let solution = solve_normal_equations(c, y, singular_threshold)?;
    let diagnostics = SolveDiagnostics {
        method: solution.method,
        rank: solution.rank,
        max_rank: solution.max_rank,
        residual_norm: solution.residual_norm,
    };

    let mut weights: Vec<f64> = solution.weights.iter().copied().collect();
    if convention == WeightConvention::Fraction {
        let sum: f64 = weights.iter().sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(PortfolioError::invalid_portfolio(format!(
                "cannot normalize weights summing to {sum}"
            )));
        }
        for w in &mut weights {
            *w /= sum;
        }
    }

    tracing::debug!(
        method = ?diagnostics.method,
        rank = diagnostics.rank,
        max_rank = diagnostics.max_rank,
        convention = %convention,
        "solved portfolio weights"
    );

    Ok(WeightSolution {
        weights,
        convention,
        diagnostics,
    })
}
