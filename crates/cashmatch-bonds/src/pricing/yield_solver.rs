//! Yield-to-maturity solver.
//!
//! Solves `dirty_price(y) = clean_price + accrued` by bisection. The root is
//! bracketed either by widening a caller-supplied interval or by scanning a
//! fixed grid of anchor yields (plus hints around the initial guess and the
//! coupon). Yields are kept above `-0.99 f` so the compounding base
//! `1 + y/f` stays positive.
//!
//! # Example
//!
//! ```rust
//! use cashmatch_bonds::cashflows::ScheduleConfig;
//! use cashmatch_bonds::pricing::{BondPricer, YieldSolver};
//! use cashmatch_core::{Date, Frequency};
//!
//! let config = ScheduleConfig::new(
//!     Date::from_ymd(2020, 1, 1).unwrap(),
//!     Date::from_ymd(2030, 1, 1).unwrap(),
//!     5.0,
//!     Frequency::SemiAnnual,
//! );
//! let pricer = BondPricer::new(config, None).unwrap();
//! let settlement = Date::from_ymd(2024, 3, 15).unwrap();
//!
//! let solver = YieldSolver::new();
//! let result = pricer.yield_from_clean_price(95.0, settlement, 7, &solver).unwrap();
//! assert!(result.converged);
//! assert!(result.yield_value > 0.05);
//! ```

use cashmatch_core::Date;
use cashmatch_math::solvers::{expand_bracket, scan_grid, try_bisection, SolverConfig};

use crate::error::{BondError, BondResult};
use crate::pricing::{BondPricer, PricingConfig};

/// Result of a yield calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldResult {
    /// The calculated yield (as a decimal, e.g., 0.05 for 5%).
    pub yield_value: f64,
    /// Number of bisection iterations.
    pub iterations: u32,
    /// Final price residual.
    pub residual: f64,
    /// True if the residual or interval width reached tolerance.
    pub converged: bool,
    /// Sign changes seen while scanning the anchor grid (zero when a
    /// supplied bracket was used).
    pub sign_changes: usize,
}

impl YieldResult {
    fn exact(y: f64, sign_changes: usize) -> Self {
        Self {
            yield_value: y,
            iterations: 0,
            residual: 0.0,
            converged: true,
            sign_changes,
        }
    }
}

/// Bracketing bisection solver for bond yields.
#[derive(Debug, Clone)]
pub struct YieldSolver {
    config: SolverConfig,
    max_bracket_expansions: u32,
    initial_guess: Option<f64>,
    bracket: Option<(f64, f64)>,
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldSolver {
    /// Creates a solver with tolerance 1e-10, 200 iterations and 12
    /// bracket expansions.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&PricingConfig::default())
    }

    /// Creates a solver from the solver settings in `config`.
    #[must_use]
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            config: SolverConfig::new(config.tolerance, config.max_iterations),
            max_bracket_expansions: config.max_bracket_expansions,
            initial_guess: None,
            bracket: None,
        }
    }

    /// Sets the price tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config = self.config.with_max_iterations(max_iterations);
        self
    }

    /// Adds anchors at `guess ± 0.05` to the grid scan.
    #[must_use]
    pub fn with_initial_guess(mut self, guess: f64) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    /// Tries `[lo, hi]` first, widening it if needed.
    #[must_use]
    pub fn with_bracket(mut self, lo: f64, hi: f64) -> Self {
        self.bracket = Some((lo, hi));
        self
    }

    /// Sets how many times a supplied bracket may be widened.
    #[must_use]
    pub fn with_max_bracket_expansions(mut self, expansions: u32) -> Self {
        self.max_bracket_expansions = expansions;
        self
    }

    /// Solves for the yield that prices `pricer` at `clean_price`.
    ///
    /// # Errors
    ///
    /// Returns `YieldNotBracketed` if no anchor pair changes sign.
    pub fn solve(
        &self,
        pricer: &BondPricer<'_>,
        clean_price: f64,
        settlement: Date,
        ex_div_days: i32,
    ) -> BondResult<YieldResult> {
        let target = clean_price + pricer.accrued_interest(settlement, ex_div_days);
        let objective = |y: f64| -> BondResult<f64> {
            Ok(pricer.dirty_price_from_yield(y, settlement, ex_div_days)? - target)
        };

        let f = f64::from(pricer.frequency().periods_per_year());
        let floor = -0.99 * f + 1e-9;

        if let Some((a, b)) = self.bracket {
            let a = a.max(floor);
            let b = b.max(floor + 1e-9);
            if let Some(bracket) =
                expand_bracket(&objective, a, b, floor, self.max_bracket_expansions)?
            {
                if bracket.f_lo == 0.0 {
                    return Ok(YieldResult::exact(bracket.lo, 0));
                }
                if bracket.f_hi == 0.0 {
                    return Ok(YieldResult::exact(bracket.hi, 0));
                }
                return self.bisect(&objective, bracket.lo, bracket.hi, 0, clean_price);
            }
            tracing::debug!(
                lo = a,
                hi = b,
                "supplied bracket did not change sign, scanning anchors"
            );
        }

        let grid = self.anchor_grid(f, floor, pricer.coupon_rate());
        let scan = scan_grid(&objective, &grid);

        if let Some(root) = scan.exact_root {
            return Ok(YieldResult::exact(root, scan.sign_changes));
        }
        let Some(bracket) = scan.first else {
            return Err(BondError::YieldNotBracketed {
                clean_price,
                settlement,
                evaluated: scan.evaluated,
            });
        };

        if scan.sign_changes > 1 {
            tracing::warn!(
                clean_price,
                settlement = %settlement,
                sign_changes = scan.sign_changes,
                chosen_lo = bracket.lo,
                chosen_hi = bracket.hi,
                "multiple yield roots bracketed, using the lowest"
            );
        }

        self.bisect(&objective, bracket.lo, bracket.hi, scan.sign_changes, clean_price)
    }

    fn bisect<F>(
        &self,
        objective: &F,
        lo: f64,
        hi: f64,
        sign_changes: usize,
        clean_price: f64,
    ) -> BondResult<YieldResult>
    where
        F: Fn(f64) -> BondResult<f64>,
    {
        let result = try_bisection(objective, lo, hi, &self.config)?;
        if !result.converged {
            tracing::warn!(
                clean_price,
                yield_value = result.root,
                residual = result.residual,
                iterations = result.iterations,
                "yield solve hit the iteration limit"
            );
        }
        Ok(YieldResult {
            yield_value: result.root,
            iterations: result.iterations,
            residual: result.residual,
            converged: result.converged,
            sign_changes,
        })
    }

    fn anchor_grid(&self, f: f64, floor: f64, coupon: f64) -> Vec<f64> {
        let mut anchors = vec![
            floor + 1e-9,
            -0.75 * f,
            -0.5 * f,
            -0.25 * f,
            -0.10 * f,
            -0.05,
            0.0,
            0.01,
            0.02,
            0.05,
            0.10,
            0.20,
            0.50,
            1.0,
            2.0,
            5.0,
            10.0,
        ];
        if let Some(guess) = self.initial_guess {
            anchors.extend([guess - 0.05, guess + 0.05]);
        }
        anchors.extend([(coupon - 0.05).max(floor), coupon + 0.05]);

        anchors.retain(|y| y.is_finite() && *y > floor);
        anchors.sort_by(f64::total_cmp);
        anchors.dedup();
        anchors
    }
}
