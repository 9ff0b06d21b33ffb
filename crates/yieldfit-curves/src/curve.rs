//! Fitted yield curve.

use log::debug;
use rust_decimal::prelude::ToPrimitive;

use yieldfit_bonds::{BondError, FixedBond};
use yieldfit_core::Date;

use crate::config::{CurveConfig, Extrapolation};
use crate::error::{CurveError, CurveResult};
use crate::models::{CurveFitModel, CurveModel};
use crate::observation::{maturity_span, YieldObservation};

/// A yield curve fitted to bond yields at a settlement date.
///
/// The model is fitted once, during construction, and the curve is
/// read-only afterwards; fitting again means building a new curve. Queries
/// take `&self` and are deterministic, so a curve can be shared across
/// threads freely.
///
/// # Example
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use yieldfit_bonds::FixedBond;
/// use yieldfit_core::Date;
/// use yieldfit_curves::prelude::*;
///
/// let settlement = Date::from_ymd(2020, 1, 15).unwrap();
/// let bonds: Vec<FixedBond> = [2, 5, 10, 30]
///     .iter()
///     .map(|&years| {
///         FixedBond::builder()
///             .coupon_rate(dec!(0.02))
///             .maturity(settlement.add_months(12 * years).unwrap())
///             .build()
///             .unwrap()
///     })
///     .collect();
/// let yields = [0.010, 0.015, 0.020, 0.025];
///
/// let curve = YieldCurve::new(settlement, &bonds, &yields, CurveFitModel::nelson_siegel()).unwrap();
/// let y = curve.interpolated_yield(Date::from_ymd(2025, 1, 15).unwrap()).unwrap();
/// assert!((y - 0.015).abs() < 5e-4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurve {
    settlement: Date,
    observations: Vec<YieldObservation>,
    model: CurveFitModel,
    config: CurveConfig,
}

impl YieldCurve {
    /// Fits `model` to the bonds' observed yields with the default configuration.
    ///
    /// # Errors
    ///
    /// - `CurveError::LengthMismatch` if `bonds` and `yields` differ in length
    /// - `CurveError::Bond` with `BondError::InvalidSettlement` if a bond
    ///   matures on or before `settlement`
    /// - any error from the model fit
    pub fn new(
        settlement: Date,
        bonds: &[FixedBond],
        yields: &[f64],
        model: CurveFitModel,
    ) -> CurveResult<Self> {
        Self::with_config(settlement, bonds, yields, model, CurveConfig::default())
    }

    /// Fits `model` to the bonds' observed yields.
    pub fn with_config(
        settlement: Date,
        bonds: &[FixedBond],
        yields: &[f64],
        model: CurveFitModel,
        config: CurveConfig,
    ) -> CurveResult<Self> {
        if bonds.len() != yields.len() {
            return Err(CurveError::LengthMismatch {
                bonds: bonds.len(),
                yields: yields.len(),
            });
        }

        let observations = bonds
            .iter()
            .zip(yields)
            .map(|(bond, &y)| -> CurveResult<YieldObservation> {
                if bond.maturity() <= settlement {
                    return Err(BondError::InvalidSettlement {
                        settlement,
                        maturity: bond.maturity(),
                    }
                    .into());
                }
                let maturity = year_fraction(&config, settlement, bond.maturity())?;
                Ok(YieldObservation::new(maturity, y))
            })
            .collect::<CurveResult<Vec<_>>>()?;

        Self::from_observations(settlement, observations, model, config)
    }

    /// Fits `model` to observations already expressed in years.
    pub fn from_observations(
        settlement: Date,
        observations: Vec<YieldObservation>,
        mut model: CurveFitModel,
        config: CurveConfig,
    ) -> CurveResult<Self> {
        model.fit(&observations, &config.fitter)?;

        let curve = Self {
            settlement,
            observations,
            model,
            config,
        };
        debug!(
            "{} curve at {settlement} over {} observations, rms {:.3e}",
            curve.model,
            curve.observations.len(),
            curve.rms_error()
        );
        Ok(curve)
    }

    /// Settlement date.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// The fitted model.
    #[must_use]
    pub fn model(&self) -> &CurveFitModel {
        &self.model
    }

    /// Curve configuration.
    #[must_use]
    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Observations the model was fitted to, in input order.
    #[must_use]
    pub fn observations(&self) -> &[YieldObservation] {
        &self.observations
    }

    /// Time from settlement to `date` in years under the curve's time basis.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidDate` if `date <= settlement`.
    pub fn time_to(&self, date: Date) -> CurveResult<f64> {
        if date <= self.settlement {
            return Err(CurveError::InvalidDate {
                date,
                settlement: self.settlement,
            });
        }
        year_fraction(&self.config, self.settlement, date)
    }

    /// Fitted yield for a payment on `date`.
    ///
    /// Outside the observed maturities the result follows the configured
    /// [`Extrapolation`]; by default the model is evaluated unguarded.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidDate` if `date <= settlement`.
    pub fn interpolated_yield(&self, date: Date) -> CurveResult<f64> {
        let t = self.time_to(date)?;
        self.yield_at_time(t)
    }

    /// Fitted yield at `maturity` years, honouring the extrapolation setting.
    pub fn yield_at_time(&self, maturity: f64) -> CurveResult<f64> {
        let t = match self.config.extrapolation {
            Extrapolation::Unguarded => maturity,
            Extrapolation::Flat => {
                let (lo, hi) = maturity_span(&self.observations);
                maturity.clamp(lo, hi)
            }
        };
        self.model.yield_at(t)
    }

    /// Fitted minus observed yield, per observation.
    #[must_use]
    pub fn residuals(&self) -> Vec<f64> {
        self.observations
            .iter()
            .map(|o| {
                self.model
                    .yield_at(o.maturity)
                    .map_or(f64::NAN, |y| y - o.yield_value)
            })
            .collect()
    }

    /// Root mean square residual.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        let residuals = self.residuals();
        if residuals.is_empty() {
            return 0.0;
        }
        (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt()
    }

    /// Largest absolute residual.
    #[must_use]
    pub fn max_abs_error(&self) -> f64 {
        self.residuals().iter().fold(0.0, |acc, r| acc.max(r.abs()))
    }

    /// The curve on `points` evenly spaced maturities in `(0, max_years]`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidParameter` if `max_years` is not positive
    /// or `points` is zero.
    pub fn sample(&self, max_years: f64, points: usize) -> CurveResult<Vec<YieldObservation>> {
        if !(max_years.is_finite() && max_years > 0.0) {
            return Err(CurveError::invalid_parameter(
                "max_years",
                format!("must be positive, got {max_years}"),
            ));
        }
        if points == 0 {
            return Err(CurveError::invalid_parameter("points", "must be at least 1"));
        }

        (1..=points)
            .map(|i| {
                let t = max_years * i as f64 / points as f64;
                Ok(YieldObservation::new(t, self.yield_at_time(t)?))
            })
            .collect()
    }
}

fn year_fraction(config: &CurveConfig, start: Date, end: Date) -> CurveResult<f64> {
    let fraction = config.time_basis.year_fraction(start, end)?;
    fraction
        .to_f64()
        .ok_or_else(|| CurveError::invalid_parameter("maturity", "year fraction out of range"))
}
