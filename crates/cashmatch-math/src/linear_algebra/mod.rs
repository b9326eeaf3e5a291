//! Linear algebra utilities.
//!
//! Least-squares solvers for overdetermined and rank-deficient systems.

mod least_squares;

pub use least_squares::{
    solve_least_squares, solve_normal_equations, LeastSquaresSolution, SolveMethod,
    DEFAULT_SINGULAR_THRESHOLD,
};
