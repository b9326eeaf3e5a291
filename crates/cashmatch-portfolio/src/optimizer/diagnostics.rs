//! Goodness of fit for a weight vector.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::error::{PortfolioError, PortfolioResult};

/// Fit of `C·w` against `Y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitDiagnostics {
    /// `C·w`.
    pub predicted: Vec<f64>,
    /// `Y − C·w`.
    pub residuals: Vec<f64>,
    /// Mean of squared residuals.
    pub mse: f64,
    /// Coefficient of determination.
    ///
    /// When `Y` is constant this is 1 for a perfect fit and 0 otherwise.
    pub r_squared: f64,
}

/// Computes predicted values, residuals, MSE and R².
///
/// # Errors
///
/// Returns `PortfolioError::DimensionMismatch` if `w` does not match the
/// columns of `C` or `y` its rows, and `PortfolioError::InvalidPortfolio` if
/// there are no rows.
pub fn fit_diagnostics(c: &DMatrix<f64>, w: &[f64], y: &DVector<f64>) -> PortfolioResult<FitDiagnostics> {
    if w.len() != c.ncols() {
        return Err(PortfolioError::dimension_mismatch("weights", c.ncols(), w.len()));
    }
    if y.len() != c.nrows() {
        return Err(PortfolioError::dimension_mismatch("target", c.nrows(), y.len()));
    }
    if y.is_empty() {
        return Err(PortfolioError::invalid_portfolio("no observations to fit"));
    }

    let predicted = c * DVector::from_column_slice(w);
    let residuals = y - &predicted;

    let n = y.len() as f64;
    let ss_res = residuals.norm_squared();
    let mean = y.mean();
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();

    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    Ok(FitDiagnostics {
        predicted: predicted.iter().copied().collect(),
        residuals: residuals.iter().copied().collect(),
        mse: ss_res / n,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_perfect_fit() {
        let c = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_vec(vec![1.0, 2.0]);

        let fit = fit_diagnostics(&c, &[1.0, 1.0], &y).unwrap();
        assert_eq!(fit.mse, 0.0);
        assert_eq!(fit.r_squared, 1.0);
        assert_eq!(fit.predicted, vec![1.0, 2.0]);
        assert_eq!(fit.residuals, vec![0.0, 0.0]);
    }

    #[test]
    fn test_imperfect_fit() {
        let c = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        let y = DVector::from_vec(vec![1.0, 3.0, 3.0]);

        let fit = fit_diagnostics(&c, &[1.0], &y).unwrap();
        assert_eq!(fit.residuals, vec![0.0, 1.0, 0.0]);
        assert_relative_eq!(fit.mse, 1.0 / 3.0);
        // ss_tot = (1-7/3)² + 2·(3-7/3)² = 16/9 + 8/9
        assert_abs_diff_eq!(fit.r_squared, 1.0 - 1.0 / (24.0 / 9.0), epsilon = 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let c = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_vec(vec![5.0, 5.0]);

        assert_eq!(fit_diagnostics(&c, &[5.0], &y).unwrap().r_squared, 1.0);
        assert_eq!(fit_diagnostics(&c, &[4.0], &y).unwrap().r_squared, 0.0);
    }

    #[test]
    fn test_shape_checks() {
        let c = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_vec(vec![5.0, 5.0]);
        assert!(matches!(
            fit_diagnostics(&c, &[1.0, 2.0], &y),
            Err(PortfolioError::DimensionMismatch { .. })
        ));
    }
}
