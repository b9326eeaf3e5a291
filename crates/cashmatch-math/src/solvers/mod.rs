//! Root-finding algorithms.
//!
//! - [`bisection`] / [`try_bisection`]: reliable bracketing method
//! - [`expand_bracket`]: widens an interval until the function changes sign
//! - [`scan_grid`]: locates the first sign change across a grid of anchors
//!
//! The `try_` variants accept fallible objective functions so callers can
//! propagate their own error type through the solver.
//!
//! # Example
//!
//! ```rust
//! use cashmatch_math::solvers::{scan_grid, try_bisection, SolverConfig};
//!
//! // Yield of a 2-period bond priced at 98
//! let f = |y: f64| -> Result<f64, cashmatch_math::MathError> {
//!     Ok(5.0 / (1.0 + y) + 105.0 / (1.0 + y).powi(2) - 98.0)
//! };
//!
//! let scan = scan_grid(f, &[0.0, 0.01, 0.05, 0.10, 0.20]);
//! let bracket = scan.first.unwrap();
//! let result = try_bisection(f, bracket.lo, bracket.hi, &SolverConfig::default()).unwrap();
//! assert!(result.root > 0.05);
//! ```

mod bisection;
mod bracket;

pub use bisection::{bisection, try_bisection};
pub use bracket::{expand_bracket, scan_grid, Bracket, GridScan};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
    /// False if the iteration budget ran out before the tolerance was met.
    pub converged: bool,
}
