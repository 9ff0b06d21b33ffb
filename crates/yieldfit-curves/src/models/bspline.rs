//! Least squares B-spline yield curve.

use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use yieldfit_math::interpolation::BSplineBasis;
use yieldfit_math::linear_algebra::least_squares;

use super::CurveModel;
use crate::config::{FitterConfig, DEFAULT_SPLINE_DEGREE, DEFAULT_SPLINE_KNOTS};
use crate::error::{CurveError, CurveResult};
use crate::observation::{self, YieldObservation};

/// Fitted B-spline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BSplineParameters {
    /// Spline degree.
    pub degree: usize,
    /// Full clamped knot vector, end points repeated `degree + 1` times.
    pub knots: Vec<f64>,
    /// One coefficient per basis function.
    pub coefficients: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct FittedSpline {
    basis: BSplineBasis,
    parameters: BSplineParameters,
}

/// `y(t) = Σ c_j B_j(t)` over caller-supplied interior knots.
///
/// The basis is clamped at the shortest and longest observed maturities, so
/// every interior knot must lie strictly between them. Beyond those end
/// points the curve continues along the end polynomial pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct BSpline {
    knots: Vec<f64>,
    degree: usize,
    fitted: Option<FittedSpline>,
}

impl Default for BSpline {
    fn default() -> Self {
        Self::new(DEFAULT_SPLINE_KNOTS.to_vec())
    }
}

impl BSpline {
    /// Creates an unfitted cubic spline over the given interior knots.
    #[must_use]
    pub fn new(knots: Vec<f64>) -> Self {
        Self {
            knots,
            degree: DEFAULT_SPLINE_DEGREE,
            fitted: None,
        }
    }

    /// Sets the spline degree.
    #[must_use]
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Interior knots.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Spline degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fitted parameters, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&BSplineParameters> {
        self.fitted.as_ref().map(|f| &f.parameters)
    }

    fn check_knots(&self, lower: f64, upper: f64) -> CurveResult<()> {
        if self.knots.iter().any(|k| !k.is_finite()) {
            return Err(CurveError::invalid_parameter("knots", "knots must be finite"));
        }
        if self.knots.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CurveError::invalid_parameter(
                "knots",
                "knots must be strictly increasing",
            ));
        }
        if let Some(k) = self.knots.iter().find(|&&k| k <= lower || k >= upper) {
            return Err(CurveError::invalid_parameter(
                "knots",
                format!("knot {k} is outside the observed maturities ({lower}, {upper})"),
            ));
        }
        Ok(())
    }
}

impl CurveModel for BSpline {
    fn name(&self) -> &'static str {
        "B-Spline"
    }

    fn parameter_count(&self) -> usize {
        self.knots.len() + self.degree + 1
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn yield_at(&self, maturity: f64) -> CurveResult<f64> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(CurveError::NotFitted { model: self.name() })?;
        Ok(fitted
            .basis
            .combine(&fitted.parameters.coefficients, maturity)?)
    }

    fn fit(&mut self, observations: &[YieldObservation], config: &FitterConfig) -> CurveResult<()> {
        observation::validate(observations, self.parameter_count())?;

        let (lower, upper) = observation::maturity_span(observations);
        // One distinct maturity determines a single level.
        if !(lower < upper) {
            return Err(CurveError::SingularFit {
                rank: 1,
                required: self.parameter_count(),
            });
        }
        self.check_knots(lower, upper)?;
        let basis = BSplineBasis::clamped(self.degree, &self.knots, lower, upper)?;

        let rows = observations.len();
        let mut design = DMatrix::zeros(rows, basis.len());
        for (i, obs) in observations.iter().enumerate() {
            for (j, value) in basis.evaluate(obs.maturity).into_iter().enumerate() {
                design[(i, j)] = value;
            }
        }
        let rhs = DVector::from_iterator(rows, observations.iter().map(|o| o.yield_value));

        let coefficients = least_squares(&design, &rhs, config.rank_tolerance)?;

        debug!(
            "b-spline degree {} with {} interior knots fitted to {rows} observations",
            self.degree,
            self.knots.len()
        );
        let parameters = BSplineParameters {
            degree: self.degree,
            knots: basis.knots().to_vec(),
            coefficients: coefficients.iter().copied().collect(),
        };
        self.fitted = Some(FittedSpline { basis, parameters });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(t: f64) -> f64 {
        0.04 - 0.03 * (-t / 3.0).exp()
    }

    fn observations(ts: &[f64]) -> Vec<YieldObservation> {
        ts.iter().map(|&t| YieldObservation::new(t, curve(t))).collect()
    }

    #[test]
    fn test_exact_reproduction_when_square() {
        let obs = observations(&[0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0]);
        let mut model = BSpline::default();
        assert_eq!(model.parameter_count(), 8);
        model.fit(&obs, &FitterConfig::default()).unwrap();

        for o in &obs {
            assert_relative_eq!(model.yield_at(o.maturity).unwrap(), o.yield_value, epsilon = 1e-10);
        }
        let params = model.parameters().unwrap();
        assert_eq!(params.coefficients.len(), 8);
        assert_eq!(params.knots.len(), 4 + 2 * 4);
    }

    #[test]
    fn test_smooths_overdetermined_data() {
        let ts: Vec<f64> = (1..=40).map(|i| f64::from(i) * 0.5).collect();
        let obs = observations(&ts);
        let mut model = BSpline::new(vec![2.0, 5.0, 10.0]);
        model.fit(&obs, &FitterConfig::default()).unwrap();

        for t in [0.75, 4.2, 12.3, 19.9] {
            assert!((model.yield_at(t).unwrap() - curve(t)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_clustered_knots_are_singular() {
        let obs = observations(&[0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0]);
        let mut model = BSpline::new(vec![5.1, 5.2, 5.3, 5.4]);
        assert!(matches!(
            model.fit(&obs, &FitterConfig::default()),
            Err(CurveError::SingularFit { .. })
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_empty_knot_span_is_singular() {
        // No observation between 4 and 7, so two linear basis functions vanish.
        let obs = observations(&[0.5, 1.0, 2.0, 3.0, 8.0, 10.0, 15.0, 20.0]);
        let mut model = BSpline::new(vec![4.0, 5.0, 6.0, 7.0]).with_degree(1);
        assert!(matches!(
            model.fit(&obs, &FitterConfig::default()),
            Err(CurveError::SingularFit {
                rank: 4,
                required: 6
            })
        ));
    }

    #[test]
    fn test_single_maturity_is_singular() {
        let obs: Vec<_> = (0..6)
            .map(|i| YieldObservation::new(5.0, 0.03 + 0.001 * f64::from(i)))
            .collect();

        let mut spline = BSpline::new(vec![]);
        assert_eq!(
            spline.fit(&obs, &FitterConfig::default()),
            Err(CurveError::SingularFit {
                rank: 1,
                required: 4
            })
        );
        assert!(!spline.is_fitted());

        let mut with_knots = BSpline::new(vec![2.0, 8.0]).with_degree(1);
        assert!(matches!(
            with_knots.fit(&obs, &FitterConfig::default()),
            Err(CurveError::SingularFit { rank: 1, required: 4 })
        ));

        let mut polynomial = crate::models::Polynomial::new(3);
        assert_eq!(
            polynomial.fit(&obs, &FitterConfig::default()),
            spline.fit(&obs, &FitterConfig::default())
        );
    }

    #[test]
    fn test_knot_validation() {
        let obs = observations(&[0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0]);

        let mut outside = BSpline::new(vec![1.0, 3.0, 20.0]);
        assert!(matches!(
            outside.fit(&obs, &FitterConfig::default()),
            Err(CurveError::InvalidParameter { .. })
        ));

        let mut unordered = BSpline::new(vec![3.0, 1.0]);
        assert!(matches!(
            unordered.fit(&obs, &FitterConfig::default()),
            Err(CurveError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_insufficient_data() {
        let obs = observations(&[0.5, 1.0, 2.0, 3.0, 5.0]);
        let mut model = BSpline::default();
        assert_eq!(
            model.fit(&obs, &FitterConfig::default()),
            Err(CurveError::insufficient_data(8, 5))
        );
    }

    #[test]
    fn test_unfitted_query() {
        assert!(matches!(
            BSpline::default().yield_at(2.0),
            Err(CurveError::NotFitted { model: "B-Spline" })
        ));
    }
}
