//! Bisection root-finding algorithm.

use crate::error::MathError;
use crate::solvers::{SolverConfig, SolverResult};

/// Bisection root-finding algorithm.
///
/// Repeatedly halves the interval and keeps the half containing the sign
/// change. Stops when `|f(mid)| < tolerance` or the half-width drops
/// below `tolerance`. If the iteration budget runs out first, the final
/// midpoint is returned with `converged == false`.
///
/// Requires: `f(a) * f(b) <= 0` (opposite signs at endpoints)
///
/// # Example
///
/// ```rust
/// use cashmatch_math::solvers::{bisection, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> Result<SolverResult, MathError>
where
    F: Fn(f64) -> f64,
{
    try_bisection(|x| Ok::<f64, MathError>(f(x)), a, b, config)
}

/// Bisection over a fallible function.
///
/// Errors from `f` are propagated unchanged; a bracket without a sign
/// change yields `MathError::InvalidBracket` converted into `E`.
pub fn try_bisection<F, E>(
    mut f: F,
    a: f64,
    b: f64,
    config: &SolverConfig,
) -> Result<SolverResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<MathError>,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);

    let mut f_lo = f(lo)?;
    let f_hi = f(hi)?;

    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        }
        .into());
    }

    if f_lo.abs() < config.tolerance {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: f_lo,
            converged: true,
        });
    }
    if f_hi.abs() < config.tolerance {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: f_hi,
            converged: true,
        });
    }

    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid)?;

        if f_mid.abs() < config.tolerance || 0.5 * (hi - lo) < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration + 1,
                residual: f_mid,
                converged: true,
            });
        }

        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = 0.5 * (lo + hi);
    Ok(SolverResult {
        root: mid,
        iterations: config.max_iterations,
        residual: f(mid)?,
        converged: false,
    })
}
