//! Fit and curve configuration.
//!
//! Every tolerance used by a fit is carried in these values and passed
//! explicitly to the model, so two curves built with the same inputs and
//! configuration always produce the same parameters.

use serde::{Deserialize, Serialize};

use yieldfit_core::daycounts::DayCountConvention;
use yieldfit_math::optimization::LevenbergMarquardtConfig;

use crate::error::{CurveError, CurveResult};

/// Default polynomial degree.
pub const DEFAULT_POLYNOMIAL_DEGREE: usize = 3;

/// Default B-spline degree (cubic).
pub const DEFAULT_SPLINE_DEGREE: usize = 3;

/// Default interior B-spline knots, in years.
pub const DEFAULT_SPLINE_KNOTS: [f64; 4] = [1.0, 3.0, 5.0, 10.0];

/// Default box for Nelson-Siegel decay constants, in years.
pub const DEFAULT_TAU_BOUNDS: (f64, f64) = (0.01, 100.0);

/// Numerical settings shared by all model fits.
///
/// The Levenberg-Marquardt fields drive the Nelson-Siegel family;
/// `rank_tolerance` drives the linear least squares behind the polynomial
/// and B-spline fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitterConfig {
    /// Maximum optimizer iterations.
    pub max_iterations: u32,
    /// Gradient tolerance.
    pub gradient_tolerance: f64,
    /// Relative cost-reduction tolerance.
    pub cost_tolerance: f64,
    /// Relative step tolerance.
    pub step_tolerance: f64,
    /// Initial damping.
    pub initial_lambda: f64,
    /// Damping adjustment factor.
    pub lambda_factor: f64,
    /// Minimum damping.
    pub min_lambda: f64,
    /// Maximum damping.
    pub max_lambda: f64,
    /// Relative finite-difference step for the Jacobian.
    pub jacobian_step: f64,
    /// Singular values below `rank_tolerance × σ_max` count as zero.
    /// `None` uses `max(rows, cols) × ε`.
    pub rank_tolerance: Option<f64>,
}

impl Default for FitterConfig {
    fn default() -> Self {
        let lm = LevenbergMarquardtConfig::default();
        Self {
            max_iterations: lm.max_iterations,
            gradient_tolerance: lm.gradient_tolerance,
            cost_tolerance: lm.cost_tolerance,
            step_tolerance: lm.step_tolerance,
            initial_lambda: lm.initial_lambda,
            lambda_factor: lm.lambda_factor,
            min_lambda: lm.min_lambda,
            max_lambda: lm.max_lambda,
            jacobian_step: lm.jacobian_step,
            rank_tolerance: None,
        }
    }
}

impl FitterConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum optimizer iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the relative rank tolerance for linear fits.
    #[must_use]
    pub fn with_rank_tolerance(mut self, tolerance: f64) -> Self {
        self.rank_tolerance = Some(tolerance);
        self
    }

    /// The optimizer settings.
    #[must_use]
    pub fn levenberg_marquardt(&self) -> LevenbergMarquardtConfig {
        LevenbergMarquardtConfig {
            max_iterations: self.max_iterations,
            gradient_tolerance: self.gradient_tolerance,
            cost_tolerance: self.cost_tolerance,
            step_tolerance: self.step_tolerance,
            initial_lambda: self.initial_lambda,
            lambda_factor: self.lambda_factor,
            min_lambda: self.min_lambda,
            max_lambda: self.max_lambda,
            jacobian_step: self.jacobian_step,
        }
    }
}

/// Behaviour of curve queries outside the observed maturity range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Evaluate the fitted model wherever asked.
    #[default]
    Unguarded,
    /// Hold the yield at the shortest/longest observed maturity.
    Flat,
}

/// Settings for a [`YieldCurve`](crate::YieldCurve).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Numerical settings for the model fit.
    pub fitter: FitterConfig,
    /// Convention turning dates into times to maturity.
    pub time_basis: DayCountConvention,
    /// Query behaviour outside the observed maturities.
    pub extrapolation: Extrapolation,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            fitter: FitterConfig::default(),
            time_basis: DayCountConvention::Act365Fixed,
            extrapolation: Extrapolation::Unguarded,
        }
    }
}

impl CurveConfig {
    /// Sets the fitter configuration.
    #[must_use]
    pub fn with_fitter(mut self, fitter: FitterConfig) -> Self {
        self.fitter = fitter;
        self
    }

    /// Sets the time basis.
    #[must_use]
    pub fn with_time_basis(mut self, time_basis: DayCountConvention) -> Self {
        self.time_basis = time_basis;
        self
    }

    /// Sets the extrapolation behaviour.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }
}

/// Decay settings for a Nelson-Siegel fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelsonSiegelConfig {
    /// Starting τ. `None` starts at the median observed maturity.
    pub initial_tau: Option<f64>,
    /// Box `(lower, upper)` that τ is kept inside during the fit.
    pub tau_bounds: (f64, f64),
}

impl Default for NelsonSiegelConfig {
    fn default() -> Self {
        Self {
            initial_tau: None,
            tau_bounds: DEFAULT_TAU_BOUNDS,
        }
    }
}

impl NelsonSiegelConfig {
    /// Checks that the decay guess and bounds are positive.
    pub fn validate(&self) -> CurveResult<()> {
        validate_tau_bounds(self.tau_bounds)?;
        validate_tau("tau", self.initial_tau)
    }
}

/// Decay settings for a Nelson-Siegel-Svensson fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvenssonConfig {
    /// Starting τ1. `None` starts at half the median observed maturity.
    pub initial_tau1: Option<f64>,
    /// Starting τ2. `None` starts at twice the median observed maturity.
    pub initial_tau2: Option<f64>,
    /// Box `(lower, upper)` applied to both decay constants.
    pub tau_bounds: (f64, f64),
}

impl Default for SvenssonConfig {
    fn default() -> Self {
        Self {
            initial_tau1: None,
            initial_tau2: None,
            tau_bounds: DEFAULT_TAU_BOUNDS,
        }
    }
}

impl SvenssonConfig {
    /// Checks that the decay guesses and bounds are positive.
    pub fn validate(&self) -> CurveResult<()> {
        validate_tau_bounds(self.tau_bounds)?;
        validate_tau("tau1", self.initial_tau1)?;
        validate_tau("tau2", self.initial_tau2)
    }
}

fn validate_tau(name: &str, tau: Option<f64>) -> CurveResult<()> {
    match tau {
        Some(t) if !(t.is_finite() && t > 0.0) => Err(CurveError::invalid_parameter(
            name,
            format!("initial decay must be positive, got {t}"),
        )),
        _ => Ok(()),
    }
}

fn validate_tau_bounds((lower, upper): (f64, f64)) -> CurveResult<()> {
    if !(lower.is_finite() && lower > 0.0) {
        return Err(CurveError::invalid_parameter(
            "tau_bounds",
            format!("lower decay bound must be positive, got {lower}"),
        ));
    }
    if !(upper > lower) {
        return Err(CurveError::invalid_parameter(
            "tau_bounds",
            format!("upper decay bound {upper} must exceed lower bound {lower}"),
        ));
    }
    Ok(())
}

/// Curve-fit selection as it appears in configuration files.
///
/// Externally tagged, so JSON reads `{"Polynomial": {"degree": 3}}`,
/// `{"NelsonSiegel": {}}`, `{"NelsonSiegelSvensson": {}}` or
/// `{"BSpline": {"knots": [1, 3, 5, 10]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveFitSpec {
    /// Polynomial in time to maturity.
    Polynomial {
        /// Polynomial degree.
        #[serde(default = "default_polynomial_degree")]
        degree: usize,
    },
    /// Nelson-Siegel.
    NelsonSiegel(NelsonSiegelConfig),
    /// Nelson-Siegel-Svensson.
    NelsonSiegelSvensson(SvenssonConfig),
    /// Least squares B-spline.
    BSpline {
        /// Interior knots in years.
        #[serde(default = "default_spline_knots")]
        knots: Vec<f64>,
        /// Spline degree.
        #[serde(default = "default_spline_degree")]
        degree: usize,
    },
}

fn default_polynomial_degree() -> usize {
    DEFAULT_POLYNOMIAL_DEGREE
}

fn default_spline_knots() -> Vec<f64> {
    DEFAULT_SPLINE_KNOTS.to_vec()
}

fn default_spline_degree() -> usize {
    DEFAULT_SPLINE_DEGREE
}
