//! # Cashmatch Math
//!
//! Numerical building blocks for the Cashmatch crates:
//!
//! - **Solvers**: bisection plus bracket expansion and grid scanning
//! - **Linear Algebra**: least squares via normal equations with an SVD fallback
//!
//! Solvers report diagnostics (iterations, residuals, rank) as data rather
//! than failing when a problem is merely ill-conditioned.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]

pub mod error;
pub mod linear_algebra;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{
        solve_least_squares, solve_normal_equations, LeastSquaresSolution, SolveMethod,
    };
    pub use crate::solvers::{
        bisection, expand_bracket, scan_grid, try_bisection, Bracket, GridScan, SolverConfig,
        SolverResult,
    };
}

pub use error::{MathError, MathResult};
