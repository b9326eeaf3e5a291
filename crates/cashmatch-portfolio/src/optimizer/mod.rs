//! Cashflow-matching weight solving.
//!
//! Weights minimize `‖C·w − Y‖²` where `C` holds cumulative bond cashflows
//! and `Y` the cumulative liability profile, so delivered cash tracks
//! required cash at every date rather than only on payment dates.

mod build;
mod diagnostics;
mod scaling;
mod weights;

pub use build::{
    build_portfolio, Holding, PortfolioRequest, PortfolioSolution, PriceProvider, RunningPoint,
};
pub use diagnostics::{fit_diagnostics, FitDiagnostics};
pub use scaling::{scale_to_budget, BudgetScaling};
pub use weights::{solve_portfolio_weights, SolveDiagnostics, WeightSolution};
