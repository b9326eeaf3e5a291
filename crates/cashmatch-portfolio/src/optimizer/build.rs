//! End-to-end portfolio construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::BuildHasher;

use cashmatch_bonds::Instrument;
use cashmatch_core::{Calendar, Date};

use super::diagnostics::fit_diagnostics;
use super::scaling::{scale_to_budget, BudgetScaling};
use super::weights::{solve_portfolio_weights, SolveDiagnostics};
use crate::aggregation::{
    build_matrix, build_target_schedule, filter_bonds_by_maturity, running_totals, unify_timeline,
};
use crate::error::{PortfolioError, PortfolioResult};
use crate::types::{CashflowTable, PortfolioConfig, TargetFrequency, WeightConvention};

/// Source of dirty prices for budget scaling.
pub trait PriceProvider {
    /// Dirty price per 100 nominal of `instrument_id` as of `as_of`.
    fn dirty_price(&self, instrument_id: &str, as_of: Date) -> Option<f64>;
}

impl<S: BuildHasher> PriceProvider for HashMap<String, f64, S> {
    fn dirty_price(&self, instrument_id: &str, _as_of: Date) -> Option<f64> {
        self.get(instrument_id).copied()
    }
}

/// What to match and with which bonds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRequest {
    /// First liability date.
    pub select_start: Date,
    /// Last liability date and latest eligible maturity.
    pub select_end: Date,
    /// Settlement date; only later cashflows are matched.
    pub settlement: Date,
    /// Liability amount per period.
    #[serde(default = "default_amount")]
    pub target_cashflow: f64,
    /// Currency amount to invest under the nominal convention.
    #[serde(default = "default_amount")]
    pub budget: f64,
    /// Liability spacing.
    #[serde(default)]
    pub frequency: TargetFrequency,
}

fn default_amount() -> f64 {
    100.0
}

impl PortfolioRequest {
    /// Monthly liabilities of 100 with a budget of 100.
    #[must_use]
    pub fn new(select_start: Date, select_end: Date, settlement: Date) -> Self {
        Self {
            select_start,
            select_end,
            settlement,
            target_cashflow: default_amount(),
            budget: default_amount(),
            frequency: TargetFrequency::Monthly,
        }
    }

    /// Sets the liability amount per period.
    #[must_use]
    pub fn with_target_cashflow(mut self, amount: f64) -> Self {
        self.target_cashflow = amount;
        self
    }

    /// Sets the budget.
    #[must_use]
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the liability spacing.
    #[must_use]
    pub fn with_frequency(mut self, frequency: TargetFrequency) -> Self {
        self.frequency = frequency;
        self
    }
}

/// One bond position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Display name.
    pub name: String,
    /// Maturity date.
    pub maturity: Option<Date>,
    /// Solved weight in the configured convention.
    pub nominal_weight: f64,
    /// Weight after budget scaling (nominal convention only).
    pub scaled_weight: Option<f64>,
    /// Dirty price used for scaling.
    pub price: Option<f64>,
    /// `scaled_weight × price`.
    pub value_invested: Option<f64>,
}

/// Cumulative target and portfolio cash on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningPoint {
    /// Timeline date.
    pub date: Date,
    /// Cumulative liability.
    pub target: f64,
    /// Cumulative weighted bond cashflow.
    pub portfolio: f64,
}

/// Result of [`build_portfolio`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSolution {
    /// Positions, ordered by maturity.
    pub holdings: Vec<Holding>,
    /// Convention of `Holding::nominal_weight`.
    pub weight_convention: WeightConvention,
    /// Budget scale factor (nominal convention only).
    pub scale: Option<f64>,
    /// Sum of value invested (nominal convention only).
    pub total_invested: Option<f64>,
    /// `C·w` on the running-total timeline.
    pub predicted_running: Vec<f64>,
    /// `Y − C·w`.
    pub residuals: Vec<f64>,
    /// Mean squared residual.
    pub mse: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Number of bonds in the portfolio.
    pub num_bonds: usize,
    /// Unified discrete cashflows, target column first.
    pub cashflows: CashflowTable,
    /// Running totals of `cashflows`.
    pub running_totals: CashflowTable,
    /// Target and portfolio running totals by date.
    pub portfolio_total: Vec<RunningPoint>,
    /// Solver details.
    pub diagnostics: SolveDiagnostics,
}

/// Builds a bond portfolio whose cumulative cashflows track a liability
/// schedule.
///
/// Bonds maturing in `[settlement, select_end]` are selected and scheduled,
/// aligned with a `select_start..=select_end` liability schedule on the
/// timeline after settlement, and accumulated into running totals. Weights
/// solve the least-squares match of the running totals. Under the nominal
/// convention they are then scaled so that their dirty-price cost equals the
/// budget, and the fit is measured on the scaled weights.
///
/// # Errors
///
/// - `PortfolioError::InvalidPortfolio` if no bond matures in the window,
///   the timeline has no nonzero cashflows, or the cost is not positive
/// - `PortfolioError::MissingPrice` if a bond has no price (nominal only)
/// - `PortfolioError::NoDatesAfterSettlement` if nothing is paid after
///   settlement
/// - `PortfolioError::Bond` if a selected bond cannot be scheduled
pub fn build_portfolio<P>(
    request: &PortfolioRequest,
    instruments: &[Instrument],
    prices: &P,
    calendar: Option<&dyn Calendar>,
    config: &PortfolioConfig,
) -> PortfolioResult<PortfolioSolution>
where
    P: PriceProvider + ?Sized,
{
    let selected: Vec<&Instrument> =
        filter_bonds_by_maturity(instruments, request.settlement, request.select_end)
            .into_iter()
            .filter(|inst| inst.is_bond())
            .collect();
    if selected.is_empty() {
        return Err(PortfolioError::invalid_portfolio(format!(
            "no bonds mature between {} and {}",
            request.settlement, request.select_end
        )));
    }

    let nominal = config.weight_convention == WeightConvention::Nominal;
    let mut price_of: HashMap<&str, f64> = HashMap::new();
    for inst in &selected {
        match prices.dirty_price(&inst.id, request.settlement) {
            Some(price) => {
                price_of.insert(inst.id.as_str(), price);
            }
            None if nominal => {
                return Err(PortfolioError::MissingPrice {
                    instrument_id: inst.id.clone(),
                    as_of: request.settlement,
                });
            }
            None => {}
        }
    }

    let matrix = build_matrix(&selected, calendar, config)?;
    let target = build_target_schedule(
        request.select_start,
        request.select_end,
        request.frequency,
        request.target_cashflow,
    )?;
    let cashflows = unify_timeline(
        &target,
        &matrix,
        Some(request.settlement),
        config.drop_zero_rows,
    )?;
    if cashflows.is_empty() {
        return Err(PortfolioError::invalid_portfolio(
            "timeline has no nonzero cashflows after settlement",
        ));
    }
    let running = running_totals(&cashflows)?;

    let (y, c, names) = running.split_target()?;
    let solution =
        solve_portfolio_weights(&c, &y, config.weight_convention, config.singular_threshold)?;

    let scaling = if nominal {
        let column_prices: Vec<f64> = names
            .iter()
            .map(|id| price_of.get(id.as_str()).copied().unwrap_or(0.0))
            .collect();
        Some(scale_to_budget(&solution.weights, &column_prices, request.budget)?)
    } else {
        None
    };

    let fit_weights = scaling
        .as_ref()
        .map_or(solution.weights.as_slice(), |s| s.scaled_weights.as_slice());
    let fit = fit_diagnostics(&c, fit_weights, &y)?;

    let holdings: Vec<Holding> = names
        .iter()
        .enumerate()
        .map(|(j, id)| {
            let inst = selected.iter().find(|inst| &inst.id == id);
            Holding {
                instrument_id: id.clone(),
                name: inst.map_or_else(|| id.clone(), |inst| inst.display_name().to_string()),
                maturity: inst.and_then(|inst| inst.maturity_date),
                nominal_weight: solution.weights[j],
                scaled_weight: scaling.as_ref().map(|s| s.scaled_weights[j]),
                price: price_of.get(id.as_str()).copied(),
                value_invested: scaling.as_ref().map(|s| s.value_invested[j]),
            }
        })
        .collect();

    let portfolio_total = running
        .dates()
        .iter()
        .zip(y.iter())
        .zip(&fit.predicted)
        .map(|((&date, &target), &portfolio)| RunningPoint {
            date,
            target,
            portfolio,
        })
        .collect();

    tracing::info!(
        bonds = holdings.len(),
        timeline = running.nrows(),
        mse = fit.mse,
        r_squared = fit.r_squared,
        method = ?solution.diagnostics.method,
        "built cashflow-matching portfolio"
    );

    Ok(PortfolioSolution {
        num_bonds: holdings.len(),
        holdings,
        weight_convention: solution.convention,
        scale: scaling.as_ref().map(|s| s.scale),
        total_invested: scaling.as_ref().map(BudgetScaling::total_invested),
        predicted_running: fit.predicted,
        residuals: fit.residuals,
        mse: fit.mse,
        r_squared: fit.r_squared,
        cashflows,
        running_totals: running,
        portfolio_total,
        diagnostics: solution.diagnostics,
    })
}
