//! Polynomial yield curve.

use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use yieldfit_math::linear_algebra::least_squares;

use super::CurveModel;
use crate::config::{FitterConfig, DEFAULT_POLYNOMIAL_DEGREE};
use crate::error::{CurveError, CurveResult};
use crate::observation::{self, YieldObservation};

/// Fitted polynomial coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialParameters {
    /// `c_0 .. c_d`, lowest order first, in units of years.
    pub coefficients: Vec<f64>,
}

/// `y(t) = Σ c_k t^k`, fitted by ordinary least squares.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    degree: usize,
    parameters: Option<PolynomialParameters>,
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::new(DEFAULT_POLYNOMIAL_DEGREE)
    }
}

impl Polynomial {
    /// Creates an unfitted polynomial of the given degree.
    #[must_use]
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            parameters: None,
        }
    }

    /// Polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fitted coefficients, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&PolynomialParameters> {
        self.parameters.as_ref()
    }
}

impl CurveModel for Polynomial {
    fn name(&self) -> &'static str {
        "Polynomial"
    }

    fn parameter_count(&self) -> usize {
        self.degree + 1
    }

    fn is_fitted(&self) -> bool {
        self.parameters.is_some()
    }

    fn yield_at(&self, maturity: f64) -> CurveResult<f64> {
        let params = self
            .parameters
            .as_ref()
            .ok_or(CurveError::NotFitted { model: self.name() })?;
        // Horner
        Ok(params
            .coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * maturity + c))
    }

    fn fit(&mut self, observations: &[YieldObservation], config: &FitterConfig) -> CurveResult<()> {
        let columns = self.parameter_count();
        observation::validate(observations, columns)?;

        // Columns are built in t / t_max so that high powers stay O(1).
        let (_, longest) = observation::maturity_span(observations);
        let scale = if longest > 0.0 { longest } else { 1.0 };

        let rows = observations.len();
        let design = DMatrix::from_fn(rows, columns, |i, k| {
            (observations[i].maturity / scale).powi(k as i32)
        });
        let rhs = DVector::from_iterator(rows, observations.iter().map(|o| o.yield_value));

        let scaled = least_squares(&design, &rhs, config.rank_tolerance)?;
        let coefficients = scaled
            .iter()
            .enumerate()
            .map(|(k, a)| a / scale.powi(k as i32))
            .collect();

        debug!("polynomial degree {} fitted to {rows} observations", self.degree);
        self.parameters = Some(PolynomialParameters { coefficients });
        Ok(())
    }
}
