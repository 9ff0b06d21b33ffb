//! Nelson-Siegel-Svensson yield curve.

use log::debug;
use serde::{Deserialize, Serialize};

use yieldfit_math::optimization::{levenberg_marquardt, Bounds};

use super::nelson_siegel::{check_fitted, end_yields, hump_loading, median_maturity, slope_loading};
use super::CurveModel;
use crate::config::{FitterConfig, SvenssonConfig};
use crate::error::{CurveError, CurveResult};
use crate::observation::{self, YieldObservation};

/// Fitted Svensson parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvenssonParameters {
    /// Level: the long-end limit.
    pub beta1: f64,
    /// Slope: `beta1 + beta2` is the short-end limit.
    pub beta2: f64,
    /// First curvature.
    pub beta3: f64,
    /// Second curvature.
    pub beta4: f64,
    /// First decay constant in years.
    pub tau1: f64,
    /// Second decay constant in years.
    pub tau2: f64,
}

impl SvenssonParameters {
    fn from_slice(p: &[f64]) -> Self {
        Self {
            beta1: p[0],
            beta2: p[1],
            beta3: p[2],
            beta4: p[3],
            tau1: p[4],
            tau2: p[5],
        }
    }

    /// Model yield at `maturity` years.
    #[must_use]
    pub fn yield_at(&self, maturity: f64) -> f64 {
        let x1 = maturity / self.tau1;
        let x2 = maturity / self.tau2;
        self.beta1
            + self.beta2 * slope_loading(x1)
            + self.beta3 * hump_loading(x1)
            + self.beta4 * hump_loading(x2)
    }
}

/// Nelson-Siegel-Svensson curve: Nelson-Siegel plus a second hump
/// `β4·[L(t/τ2) − e^{−t/τ2}]`.
///
/// Starts from the Nelson-Siegel betas with `β4 = 0`, a short decay
/// `τ1 = m / 2` and a long decay `τ2 = 2m` around the median maturity `m`,
/// unless configured. Both decays are kept inside the configured bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NelsonSiegelSvensson {
    config: SvenssonConfig,
    parameters: Option<SvenssonParameters>,
}

impl NelsonSiegelSvensson {
    /// Creates an unfitted model with the default decay settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unfitted model with custom decay settings.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidParameter` if either initial decay or the
    /// lower decay bound is not positive.
    pub fn with_config(config: SvenssonConfig) -> CurveResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parameters: None,
        })
    }

    /// Decay settings.
    #[must_use]
    pub fn config(&self) -> &SvenssonConfig {
        &self.config
    }

    /// Fitted parameters, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&SvenssonParameters> {
        self.parameters.as_ref()
    }
}

impl CurveModel for NelsonSiegelSvensson {
    fn name(&self) -> &'static str {
        "Nelson-Siegel-Svensson"
    }

    fn parameter_count(&self) -> usize {
        6
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
        let mid = median_maturity(observations);
        let tau1 = self.config.initial_tau1.unwrap_or(0.5 * mid);
        let tau2 = self.config.initial_tau2.unwrap_or(2.0 * mid);
        let initial = [long, short - long, 0.0, 0.0, tau1, tau2];

        let (lower, upper) = self.config.tau_bounds;
        let free = f64::INFINITY;
        let bounds = Bounds::new(
            vec![-free, -free, -free, -free, lower, lower],
            vec![free, free, free, free, upper, upper],
        )?;

        let residuals = |p: &[f64]| -> Vec<f64> {
            let params = SvenssonParameters::from_slice(p);
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

        let fitted = SvenssonParameters::from_slice(&result.parameters);
        check_fitted(
            &[fitted.beta1, fitted.beta2, fitted.beta3, fitted.beta4],
            &[fitted.tau1, fitted.tau2],
        )?;

        debug!(
            "svensson fitted in {} iterations ({:?}): {fitted:?}, cost {:.3e}",
            result.iterations, result.termination, result.objective_value
        );
        self.parameters = Some(fitted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn truth() -> SvenssonParameters {
        SvenssonParameters {
            beta1: 0.045,
            beta2: -0.02,
            beta3: 0.01,
            beta4: -0.005,
            tau1: 2.0,
            tau2: 8.0,
        }
    }

    fn observations() -> Vec<YieldObservation> {
        let truth = truth();
        [0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 30.0]
            .iter()
            .map(|&t| YieldObservation::new(t, truth.yield_at(t)))
            .collect()
    }

    #[test]
    fn test_reduces_to_nelson_siegel_without_second_hump() {
        let params = SvenssonParameters {
            beta4: 0.0,
            ..truth()
        };
        let x = 5.0 / params.tau1;
        let expected = params.beta1 + params.beta2 * slope_loading(x) + params.beta3 * hump_loading(x);
        assert_relative_eq!(params.yield_at(5.0), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_limits() {
        let p = truth();
        assert_relative_eq!(p.yield_at(0.0), p.beta1 + p.beta2, epsilon = 1e-15);
        assert_relative_eq!(p.yield_at(1e7), p.beta1, epsilon = 1e-7);
    }

    #[test]
    fn test_fits_generated_curve() {
        let obs = observations();
        let mut model = NelsonSiegelSvensson::new();
        model.fit(&obs, &FitterConfig::default()).unwrap();

        let worst = obs
            .iter()
            .map(|o| (model.yield_at(o.maturity).unwrap() - o.yield_value).abs())
            .fold(0.0, f64::max);
        assert!(worst < 1e-5, "max residual {worst}");

        let p = model.parameters().unwrap();
        assert!(p.tau1 > 0.0 && p.tau2 > 0.0);
    }

    #[test]
    fn test_insufficient_data() {
        let obs = &observations()[..5];
        let mut model = NelsonSiegelSvensson::new();
        assert_eq!(
            model.fit(obs, &FitterConfig::default()),
            Err(CurveError::insufficient_data(6, 5))
        );
    }

    #[test]
    fn test_invalid_decay_bounds() {
        let config = SvenssonConfig {
            tau_bounds: (-1.0, 10.0),
            ..SvenssonConfig::default()
        };
        assert!(matches!(
            NelsonSiegelSvensson::with_config(config),
            Err(CurveError::InvalidParameter { .. })
        ));
    }
}
