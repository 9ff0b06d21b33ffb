//! Yield to maturity.
//!
//! The yield `y` equates the dirty price to the bond's remaining cash
//! flows discounted at `y` compounded at the coupon frequency:
//!
//! ```text
//! dirty = Σ_k CF_k / (1 + y/f)^(w + k)
//! ```
//!
//! where `w = f × accrual_fraction(settlement, next coupon)` is the
//! fraction of a period to the next coupon under the bond's day count.

use log::debug;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yieldfit_core::{CoreError, Date};
use yieldfit_math::solvers::{newton_bisection, SolverConfig};

use crate::error::{BondError, BondResult};
use crate::instruments::FixedBond;

/// Configuration for the yield solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldSolverConfig {
    /// Price tolerance as a fraction of face value.
    pub tolerance: f64,
    /// Maximum solver iterations.
    pub max_iterations: u32,
    /// Lowest yield searched.
    pub lower_bound: f64,
    /// Highest yield searched.
    pub upper_bound: f64,
}

impl Default for YieldSolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 100,
            lower_bound: -0.99,
            upper_bound: 10.0,
        }
    }
}

/// Result of a yield calculation.
#[derive(Debug, Clone, Copy)]
pub struct YieldResult {
    /// The calculated yield (as a decimal, e.g., 0.05 for 5%).
    pub yield_value: f64,
    /// Number of iterations to converge.
    pub iterations: u32,
    /// Final price error.
    pub residual: f64,
    /// Accrued interest at settlement.
    pub accrued_interest: Decimal,
    /// Dirty price the yield reproduces.
    pub dirty_price: f64,
}

fn as_f64(value: Decimal) -> BondResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| CoreError::not_representable(value).into())
}

/// Remaining flows of a bond as `(periods from settlement, amount)`.
struct DiscountedFlows {
    flows: Vec<(f64, f64)>,
    periods_per_year: f64,
}

impl DiscountedFlows {
    fn new(bond: &FixedBond, settlement: Date) -> BondResult<Self> {
        let cash_flows = bond.cash_flow_schedule(settlement)?;
        let period = bond.current_period(settlement)?;
        let periods_per_year = f64::from(bond.frequency().periods_per_year());

        let to_next = bond
            .day_count()
            .accrual_fraction_f64(settlement, period.end, &period)?;
        let first_period = periods_per_year * to_next;

        let flows = cash_flows
            .iter()
            .enumerate()
            .map(|(k, cf)| Ok((first_period + k as f64, as_f64(cf.amount)?)))
            .collect::<BondResult<_>>()?;

        Ok(Self {
            flows,
            periods_per_year,
        })
    }

    fn present_value(&self, yield_value: f64) -> f64 {
        let base = 1.0 + yield_value / self.periods_per_year;
        self.flows
            .iter()
            .map(|(periods, amount)| amount * base.powf(-periods))
            .sum()
    }

    fn derivative(&self, yield_value: f64) -> f64 {
        let base = 1.0 + yield_value / self.periods_per_year;
        self.flows
            .iter()
            .map(|(periods, amount)| {
                -periods / self.periods_per_year * amount * base.powf(-periods - 1.0)
            })
            .sum()
    }
}

/// Yield-to-maturity solver.
///
/// Newton-Raphson on the price/yield relation, kept inside
/// `[lower_bound, upper_bound]` with bisection fallback. Price is strictly
/// decreasing in yield for non-negative flows, so the bracket always
/// contains the root of any attainable price.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldSolver {
    config: YieldSolverConfig,
}

impl YieldSolver {
    /// Creates a solver with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn with_config(config: YieldSolverConfig) -> Self {
        Self { config }
    }

    /// Sets the price tolerance (fraction of face).
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &YieldSolverConfig {
        &self.config
    }

    /// Solves for the yield that reprices `clean_price` plus accrued interest.
    ///
    /// # Errors
    ///
    /// - `BondError::InvalidPrice` if `clean_price <= 0`
    /// - `BondError::InvalidSettlement` if `settlement >= maturity`
    /// - `BondError::NoConvergence` if the price tolerance is not met
    pub fn yield_to_maturity(
        &self,
        bond: &FixedBond,
        settlement: Date,
        clean_price: Decimal,
    ) -> BondResult<YieldResult> {
        if clean_price <= Decimal::ZERO {
            return Err(BondError::invalid_price(format!(
                "clean price must be positive, got {clean_price}"
            )));
        }

        let flows = DiscountedFlows::new(bond, settlement)?;
        self.check_bracket(flows.periods_per_year)?;

        let accrued = bond.accrued_interest(settlement)?;
        let dirty = as_f64(clean_price + accrued)?;
        let face = as_f64(bond.face_value())?;

        let solver_config = SolverConfig::new(
            self.config.tolerance * face,
            self.config.max_iterations,
        );
        let guess = self.initial_guess(bond, settlement, clean_price);

        let result = newton_bisection(
            |y| flows.present_value(y) - dirty,
            |y| flows.derivative(y),
            guess,
            (self.config.lower_bound, self.config.upper_bound),
            &solver_config,
        )
        .map_err(BondError::from_solver)?;

        debug!(
            "yield {:.8} for {} at {clean_price} on {settlement} ({} iterations)",
            result.root,
            bond.identifier().unwrap_or("bond"),
            result.iterations
        );

        Ok(YieldResult {
            yield_value: result.root,
            iterations: result.iterations,
            residual: result.residual,
            accrued_interest: accrued,
            dirty_price: dirty,
        })
    }

    /// Dirty price (per the bond's face) at `yield_value`.
    pub fn dirty_price_from_yield(
        &self,
        bond: &FixedBond,
        settlement: Date,
        yield_value: f64,
    ) -> BondResult<f64> {
        let flows = DiscountedFlows::new(bond, settlement)?;
        Ok(flows.present_value(yield_value))
    }

    /// Clean price at `yield_value`: dirty price less accrued interest.
    pub fn clean_price_from_yield(
        &self,
        bond: &FixedBond,
        settlement: Date,
        yield_value: f64,
    ) -> BondResult<f64> {
        let dirty = self.dirty_price_from_yield(bond, settlement, yield_value)?;
        let accrued = as_f64(bond.accrued_interest(settlement)?)?;
        Ok(dirty - accrued)
    }

    /// Modified duration `-(dP/dy) / P` at `yield_value`.
    pub fn modified_duration(
        &self,
        bond: &FixedBond,
        settlement: Date,
        yield_value: f64,
    ) -> BondResult<f64> {
        let flows = DiscountedFlows::new(bond, settlement)?;
        let price = flows.present_value(yield_value);
        if price <= 0.0 {
            return Err(BondError::invalid_price("dirty price is not positive"));
        }
        Ok(-flows.derivative(yield_value) / price)
    }

    fn check_bracket(&self, periods_per_year: f64) -> BondResult<()> {
        let YieldSolverConfig {
            lower_bound,
            upper_bound,
            ..
        } = self.config;
        if lower_bound <= -periods_per_year || lower_bound >= upper_bound {
            return Err(BondError::invalid_spec(format!(
                "yield bracket [{lower_bound}, {upper_bound}] is invalid for {periods_per_year} periods per year"
            )));
        }
        Ok(())
    }

    /// Approximate yield `(C + (F - P) / T) / ((F + P) / 2)`, clamped into the bracket.
    fn initial_guess(&self, bond: &FixedBond, settlement: Date, clean_price: Decimal) -> f64 {
        let coupon = bond.annual_coupon().to_f64().unwrap_or(0.0);
        let face = bond.face_value().to_f64().unwrap_or(100.0);
        let price = clean_price.to_f64().unwrap_or(face);
        let years = (settlement.days_between(&bond.maturity()) as f64 / 365.25).max(1.0 / 365.25);

        let guess = (coupon + (face - price) / years) / (0.5 * (face + price));
        guess.clamp(self.config.lower_bound, self.config.upper_bound)
    }
}
