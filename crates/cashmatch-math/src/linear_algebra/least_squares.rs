//! Ordinary least squares via the normal equations with an SVD fallback.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default reciprocal condition threshold for `CᵀC`.
pub const DEFAULT_SINGULAR_THRESHOLD: f64 = 1e-14;

/// How a least-squares solution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    /// LU solve of the normal equations `(CᵀC) w = CᵀY`.
    Direct,
    /// Minimum-norm SVD solve of `C w = Y`.
    LeastSquares,
}

/// Solution of `min ‖C w − Y‖²` with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresSolution {
    /// Solution vector, one entry per column of `C`.
    pub weights: DVector<f64>,
    /// Solver that produced the weights.
    pub method: SolveMethod,
    /// Numerical rank of `C` (full column rank for the direct path).
    pub rank: usize,
    /// `min(rows, cols)` of `C`.
    pub max_rank: usize,
    /// `‖C w − Y‖₂`.
    pub residual_norm: f64,
}

impl LeastSquaresSolution {
    /// True if `C` has full rank.
    pub fn is_full_rank(&self) -> bool {
        self.rank == self.max_rank
    }
}

/// Solves `min ‖C w − Y‖²` through the normal equations.
///
/// `CᵀC` is treated as singular when its LU factorization fails, when the
/// solution is not finite, or when the ratio of its smallest to largest
/// singular value is below `singular_threshold`. In those cases the
/// minimum-norm SVD solution of `C w = Y` is returned instead, with
/// `method == SolveMethod::LeastSquares` and the numerical rank attached.
///
/// # Example
///
/// ```rust
/// use cashmatch_math::linear_algebra::{solve_normal_equations, SolveMethod};
/// use nalgebra::{DMatrix, DVector};
///
/// let c = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
/// let y = DVector::from_vec(vec![1.0, 2.0]);
///
/// let sol = solve_normal_equations(&c, &y, 1e-14).unwrap();
/// assert_eq!(sol.method, SolveMethod::Direct);
/// assert_eq!(sol.weights.as_slice(), &[1.0, 1.0]);
/// ```
pub fn solve_normal_equations(
    c: &DMatrix<f64>,
    y: &DVector<f64>,
    singular_threshold: f64,
) -> MathResult<LeastSquaresSolution> {
    validate(c, y)?;

    let ct = c.transpose();
    let ctc = &ct * c;
    let cty = &ct * y;

    let sv = ctc.singular_values();
    let sv_max = sv.max();
    let sv_min = sv.min();
    let well_conditioned = sv_max > 0.0 && sv_min / sv_max >= singular_threshold;

    if well_conditioned {
        if let Some(w) = ctc.lu().solve(&cty) {
            if w.iter().all(|v| v.is_finite()) {
                let residual_norm = (c * &w - y).norm();
                tracing::debug!(
                    rows = c.nrows(),
                    cols = c.ncols(),
                    residual_norm,
                    "normal equations solved directly"
                );
                return Ok(LeastSquaresSolution {
                    weights: w,
                    method: SolveMethod::Direct,
                    rank: c.ncols(),
                    max_rank: c.nrows().min(c.ncols()),
                    residual_norm,
                });
            }
        }
    }

    let solution = solve_least_squares(c, y)?;
    tracing::warn!(
        rank = solution.rank,
        max_rank = solution.max_rank,
        reciprocal_condition = if sv_max > 0.0 { sv_min / sv_max } else { 0.0 },
        "normal equations singular, using minimum-norm least squares"
    );
    Ok(solution)
}

/// Minimum-norm least-squares solution of `C w = Y` via SVD.
///
/// Singular values below `ε · max(rows, cols) · σ_max` are treated as zero.
pub fn solve_least_squares(
    c: &DMatrix<f64>,
    y: &DVector<f64>,
) -> MathResult<LeastSquaresSolution> {
    validate(c, y)?;

    let svd = c.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = f64::EPSILON * c.nrows().max(c.ncols()) as f64 * sigma_max;

    let w = svd.solve(y, eps).map_err(MathError::singular)?;
    if !w.iter().all(|v| v.is_finite()) {
        return Err(MathError::singular("least-squares solution is not finite"));
    }

    let residual_norm = (c * &w - y).norm();
    Ok(LeastSquaresSolution {
        weights: w,
        method: SolveMethod::LeastSquares,
        rank: svd.rank(eps),
        max_rank: c.nrows().min(c.ncols()),
        residual_norm,
    })
}

fn validate(c: &DMatrix<f64>, y: &DVector<f64>) -> MathResult<()> {
    if c.nrows() == 0 || c.ncols() == 0 {
        return Err(MathError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if c.nrows() != y.len() {
        return Err(MathError::DimensionMismatch {
            rows1: c.nrows(),
            cols1: c.ncols(),
            rows2: y.len(),
            cols2: 1,
        });
    }
    if !c.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return Err(MathError::invalid_input("matrix or target contains non-finite values"));
    }
    Ok(())
}
