//! Nelson-Siegel yield curve.

use log::debug;
use serde::{Deserialize, Serialize};

use yieldfit_math::optimization::{levenberg_marquardt, Bounds};

use super::CurveModel;
use crate::config::{FitterConfig, NelsonSiegelConfig};
use crate::error::{CurveError, CurveResult};
use crate::observation::{self, YieldObservation};

/// Fitted Nelson-Siegel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelsonSiegelParameters {
    /// Level: the long-end limit.
    pub beta1: f64,
    /// Slope: `beta1 + beta2` is the short-end limit.
    pub beta2: f64,
    /// Curvature.
    pub beta3: f64,
    /// Decay constant in years.
    pub tau: f64,
}

impl NelsonSiegelParameters {
    /// Model yield at `maturity` years.
    #[must_use]
    pub fn yield_at(&self, maturity: f64) -> f64 {
        let x = maturity / self.tau;
        self.beta1 + self.beta2 * slope_loading(x) + self.beta3 * hump_loading(x)
    }
}

/// `(1 - e^{-x}) / x`, equal to 1 at `x = 0`.
pub(crate) fn slope_loading(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        1.0 - 0.5 * x
    } else {
        -(-x).exp_m1() / x
    }
}

/// `(1 - e^{-x}) / x - e^{-x}`, equal to 0 at `x = 0`.
pub(crate) fn hump_loading(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        0.5 * x
    } else {
        slope_loading(x) - (-x).exp()
    }
}

/// Median observed maturity, used as the starting decay.
pub(crate) fn median_maturity(observations: &[YieldObservation]) -> f64 {
    let mut ts: Vec<f64> = observations.iter().map(|o| o.maturity).collect();
    ts.sort_by(f64::total_cmp);
    ts[ts.len() / 2]
}

/// Yields at the shortest and the longest observed maturities.
pub(crate) fn end_yields(observations: &[YieldObservation]) -> (f64, f64) {
    let by_maturity = |a: &&YieldObservation, b: &&YieldObservation| a.maturity.total_cmp(&b.maturity);
    let shortest = observations.iter().min_by(by_maturity).map_or(0.0, |o| o.yield_value);
    let longest = observations.iter().max_by(by_maturity).map_or(0.0, |o| o.yield_value);
    (shortest, longest)
}

/// Nelson-Siegel curve
/// `y(t) = β1 + β2·L(t/τ) + β3·[L(t/τ) − e^{−t/τ}]` with `L(x) = (1 − e^{−x})/x`.
///
/// Fitted by bounded Levenberg-Marquardt. The initial guess is
/// `β1 = longest yield`, `β2 = shortest − longest`, `β3 = 0` and τ from the
/// configuration or the median maturity; τ stays inside the configured
/// bounds throughout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NelsonSiegel {
    config: NelsonSiegelConfig,
    parameters: Option<NelsonSiegelParameters>,
}

impl NelsonSiegel {
    /// Creates an unfitted model with the default decay settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unfitted model with custom decay settings.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidParameter` if the initial τ or the lower
    /// τ bound is not positive.
    pub fn with_config(config: NelsonSiegelConfig) -> CurveResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parameters: None,
        })
    }

    /// Decay settings.
    #[must_use]
    pub fn config(&self) -> &NelsonSiegelConfig {
        &self.config
    }

    /// Fitted parameters, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&NelsonSiegelParameters> {
        self.parameters.as_ref()
    }
}

impl CurveModel for NelsonSiegel {
    fn name(&self) -> &'static str {
        "Nelson-Siegel"
    }

    fn parameter_count(&self) -> usize {
        4
    }

    fn is_fitted(&self) -> bool {
        self.parameters.is_some()
    }

    fn yield_at(&self, maturity: f64) -> CurveResult<f64> {
        self.parameters
            .map(|p| p.yield_at(maturity))
            .ok_or(CurveError::NotFitted { model: self.name() })
    }

    fn fit(&mut self, observations: &[YieldObservation], config: &FitterConfig) -> CurveResult<()> {
        self.config.validate()?;
        observation::validate(observations, self.parameter_count())?;

        let (short, long) = end_yields(observations);
        let tau = self
            .config
            .initial_tau
            .unwrap_or_else(|| median_maturity(observations));
        let initial = [long, short - long, 0.0, tau];

        let (tau_lower, tau_upper) = self.config.tau_bounds;
        let bounds = Bounds::new(
            vec![f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY, tau_lower],
            vec![f64::INFINITY, f64::INFINITY, f64::INFINITY, tau_upper],
        )?;

        let residuals = |p: &[f64]| -> Vec<f64> {
            let params = NelsonSiegelParameters {
                beta1: p[0],
                beta2: p[1],
                beta3: p[2],
                tau: p[3],
            };
            observations
                .iter()
                .map(|o| params.yield_at(o.maturity) - o.yield_value)
                .collect()
        };

        let result = levenberg_marquardt(
            residuals,
            &initial,
            Some(&bounds),
            &config.levenberg_marquardt(),
        )?;

        let p = &result.parameters;
        let fitted = NelsonSiegelParameters {
            beta1: p[0],
            beta2: p[1],
            beta3: p[2],
            tau: p[3],
        };
        check_fitted(&[fitted.beta1, fitted.beta2, fitted.beta3], &[fitted.tau])?;

        debug!(
            "nelson-siegel fitted in {} iterations ({:?}): {fitted:?}, cost {:.3e}",
            result.iterations, result.termination, result.objective_value
        );
        self.parameters = Some(fitted);
        Ok(())
    }
}

/// Rejects non-finite betas and non-positive decays.
pub(crate) fn check_fitted(betas: &[f64], taus: &[f64]) -> CurveResult<()> {
    if betas.iter().any(|b| !b.is_finite()) {
        return Err(CurveError::invalid_parameter("beta", "fit produced a non-finite level"));
    }
    if let Some(tau) = taus.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(CurveError::invalid_parameter(
            "tau",
            format!("fit produced a non-positive decay {tau}"),
        ));
    }
    Ok(())
}
