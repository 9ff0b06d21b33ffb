//! Curve fitting models.
//!
//! Each model is a pure function of maturity once fitted. [`CurveFitModel`]
//! closes over the four supported families; the [`CurveModel`] trait is the
//! interface they share.

mod bspline;
mod nelson_siegel;
mod polynomial;
mod svensson;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use bspline::{BSpline, BSplineParameters};
pub use nelson_siegel::{NelsonSiegel, NelsonSiegelParameters};
pub use polynomial::{Polynomial, PolynomialParameters};
pub use svensson::{NelsonSiegelSvensson, SvenssonParameters};

use crate::config::{CurveFitSpec, FitterConfig};
use crate::error::CurveResult;
use crate::observation::YieldObservation;

/// A yield curve model that can be fitted to observations.
pub trait CurveModel {
    /// Human-readable model name.
    fn name(&self) -> &'static str;

    /// Number of free parameters, and so the minimum number of observations.
    fn parameter_count(&self) -> usize;

    /// Whether a fit has succeeded.
    fn is_fitted(&self) -> bool;

    /// Model yield at `maturity` years.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::NotFitted` before the first successful fit.
    fn yield_at(&self, maturity: f64) -> CurveResult<f64>;

    /// Fits the parameters to `observations` by least squares.
    ///
    /// On error the model is left exactly as it was.
    fn fit(&mut self, observations: &[YieldObservation], config: &FitterConfig) -> CurveResult<()>;
}

/// Fitted parameters, named per model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FittedParameters {
    /// Polynomial coefficients.
    Polynomial(PolynomialParameters),
    /// Nelson-Siegel betas and decay.
    NelsonSiegel(NelsonSiegelParameters),
    /// Svensson betas and decays.
    NelsonSiegelSvensson(SvenssonParameters),
    /// Spline knots and coefficients.
    BSpline(BSplineParameters),
}

/// The supported curve families.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveFitModel {
    /// Polynomial in time to maturity.
    Polynomial(Polynomial),
    /// Nelson-Siegel.
    NelsonSiegel(NelsonSiegel),
    /// Nelson-Siegel-Svensson.
    NelsonSiegelSvensson(NelsonSiegelSvensson),
    /// Least squares B-spline.
    BSpline(BSpline),
}

impl CurveFitModel {
    /// Unfitted polynomial of the given degree.
    #[must_use]
    pub fn polynomial(degree: usize) -> Self {
        Self::Polynomial(Polynomial::new(degree))
    }

    /// Unfitted Nelson-Siegel model with default decay settings.
    #[must_use]
    pub fn nelson_siegel() -> Self {
        Self::NelsonSiegel(NelsonSiegel::new())
    }

    /// Unfitted Svensson model with default decay settings.
    #[must_use]
    pub fn svensson() -> Self {
        Self::NelsonSiegelSvensson(NelsonSiegelSvensson::new())
    }

    /// Unfitted cubic B-spline over the given interior knots.
    #[must_use]
    pub fn bspline(knots: Vec<f64>) -> Self {
        Self::BSpline(BSpline::new(knots))
    }

    /// Builds an unfitted model from its configuration form.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidParameter` for non-positive decay settings.
    pub fn from_spec(spec: &CurveFitSpec) -> CurveResult<Self> {
        Ok(match spec {
            CurveFitSpec::Polynomial { degree } => Self::polynomial(*degree),
            CurveFitSpec::NelsonSiegel(config) => {
                Self::NelsonSiegel(NelsonSiegel::with_config(*config)?)
            }
            CurveFitSpec::NelsonSiegelSvensson(config) => {
                Self::NelsonSiegelSvensson(NelsonSiegelSvensson::with_config(*config)?)
            }
            CurveFitSpec::BSpline { knots, degree } => {
                Self::BSpline(BSpline::new(knots.clone()).with_degree(*degree))
            }
        })
    }

    /// The configuration form of this model.
    #[must_use]
    pub fn spec(&self) -> CurveFitSpec {
        match self {
            Self::Polynomial(m) => CurveFitSpec::Polynomial { degree: m.degree() },
            Self::NelsonSiegel(m) => CurveFitSpec::NelsonSiegel(*m.config()),
            Self::NelsonSiegelSvensson(m) => CurveFitSpec::NelsonSiegelSvensson(*m.config()),
            Self::BSpline(m) => CurveFitSpec::BSpline {
                knots: m.knots().to_vec(),
                degree: m.degree(),
            },
        }
    }

    /// Fitted parameters, if the model has been fitted.
    #[must_use]
    pub fn parameters(&self) -> Option<FittedParameters> {
        match self {
            Self::Polynomial(m) => m.parameters().cloned().map(FittedParameters::Polynomial),
            Self::NelsonSiegel(m) => m.parameters().copied().map(FittedParameters::NelsonSiegel),
            Self::NelsonSiegelSvensson(m) => m
                .parameters()
                .copied()
                .map(FittedParameters::NelsonSiegelSvensson),
            Self::BSpline(m) => m.parameters().cloned().map(FittedParameters::BSpline),
        }
    }

    fn model(&self) -> &dyn CurveModel {
        match self {
            Self::Polynomial(m) => m,
            Self::NelsonSiegel(m) => m,
            Self::NelsonSiegelSvensson(m) => m,
            Self::BSpline(m) => m,
        }
    }

    fn model_mut(&mut self) -> &mut dyn CurveModel {
        match self {
            Self::Polynomial(m) => m,
            Self::NelsonSiegel(m) => m,
            Self::NelsonSiegelSvensson(m) => m,
            Self::BSpline(m) => m,
        }
    }
}

impl CurveModel for CurveFitModel {
    fn name(&self) -> &'static str {
        self.model().name()
    }

    fn parameter_count(&self) -> usize {
        self.model().parameter_count()
    }

    fn is_fitted(&self) -> bool {
        self.model().is_fitted()
    }

    fn yield_at(&self, maturity: f64) -> CurveResult<f64> {
        self.model().yield_at(maturity)
    }

    fn fit(&mut self, observations: &[YieldObservation], config: &FitterConfig) -> CurveResult<()> {
        self.model_mut().fit(observations, config)
    }
}

impl From<Polynomial> for CurveFitModel {
    fn from(model: Polynomial) -> Self {
        Self::Polynomial(model)
    }
}

impl From<NelsonSiegel> for CurveFitModel {
    fn from(model: NelsonSiegel) -> Self {
        Self::NelsonSiegel(model)
    }
}

impl From<NelsonSiegelSvensson> for CurveFitModel {
    fn from(model: NelsonSiegelSvensson) -> Self {
        Self::NelsonSiegelSvensson(model)
    }
}

impl From<BSpline> for CurveFitModel {
    fn from(model: BSpline) -> Self {
        Self::BSpline(model)
    }
}

impl fmt::Display for CurveFitModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polynomial(m) => write!(f, "Polynomial (degree {})", m.degree()),
            Self::BSpline(m) => write!(
                f,
                "B-Spline (degree {}, {} knots)",
                m.degree(),
                m.knots().len()
            ),
            other => f.write_str(other.name()),
        }
    }
}
