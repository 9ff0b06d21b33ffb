//! Nonlinear least squares.
//!
//! [`levenberg_marquardt`] minimises `Σ r_i(x)²` for a residual vector
//! `r(x)`, optionally inside box bounds.

mod levenberg_marquardt;

pub use levenberg_marquardt::levenberg_marquardt;

use crate::error::{MathError, MathResult};

/// Configuration for the Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevenbergMarquardtConfig {
    /// Maximum number of accepted-or-rejected outer iterations.
    pub max_iterations: u32,
    /// Stop when the largest gradient component `|Jᵀr|` falls below this.
    pub gradient_tolerance: f64,
    /// Stop when an accepted step reduces the cost by less than this fraction.
    pub cost_tolerance: f64,
    /// Stop when the step is smaller than this, relative to `|x|`.
    pub step_tolerance: f64,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor applied to the damping after each rejected or accepted step.
    pub lambda_factor: f64,
    /// Lower bound on the damping factor.
    pub min_lambda: f64,
    /// Damping above which the current point is treated as stationary.
    pub max_lambda: f64,
    /// Relative step for the central-difference Jacobian.
    pub jacobian_step: f64,
}

impl Default for LevenbergMarquardtConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            gradient_tolerance: 1e-12,
            cost_tolerance: 1e-14,
            step_tolerance: 1e-12,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            jacobian_step: 1e-7,
        }
    }
}

impl LevenbergMarquardtConfig {
    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the gradient tolerance.
    #[must_use]
    pub fn with_gradient_tolerance(mut self, tolerance: f64) -> Self {
        self.gradient_tolerance = tolerance;
        self
    }

    /// Sets the relative cost-reduction tolerance.
    #[must_use]
    pub fn with_cost_tolerance(mut self, tolerance: f64) -> Self {
        self.cost_tolerance = tolerance;
        self
    }
}

/// Box constraints `lower[i] <= x[i] <= upper[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates bounds, validating that every lower bound is below its upper bound.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> MathResult<Self> {
        if lower.len() != upper.len() {
            return Err(MathError::DimensionMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        if let Some(i) = (0..lower.len()).find(|&i| !(lower[i] < upper[i])) {
            return Err(MathError::invalid_input(format!(
                "bound {i}: lower {} must be below upper {}",
                lower[i], upper[i]
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Number of parameters covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Returns true when no parameters are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower bounds.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Clamps `x` into the box in place.
    pub fn project(&self, x: &mut [f64]) {
        for (i, v) in x.iter_mut().enumerate() {
            *v = v.clamp(self.lower[i], self.upper[i]);
        }
    }
}

/// Why an optimization run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Residuals are zero to machine precision.
    ExactFit,
    /// Gradient fell below `gradient_tolerance`.
    GradientTolerance,
    /// Relative cost reduction fell below `cost_tolerance`.
    CostTolerance,
    /// Step length fell below `step_tolerance`.
    StepTolerance,
    /// No damping up to `max_lambda` produced a descent step.
    Stationary,
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final sum of squared residuals.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Stopping criterion that ended the run.
    pub termination: Termination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(vec![0.0, 1.0], vec![1.0, 1.0]).is_err());
        assert!(Bounds::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(Bounds::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn test_bounds_project() {
        let bounds = Bounds::new(vec![0.0, -1.0], vec![1.0, 1.0]).unwrap();
        let mut x = [2.0, -3.0];
        bounds.project(&mut x);
        assert_eq!(x, [1.0, -1.0]);
        assert_eq!(bounds.len(), 2);
    }
}
