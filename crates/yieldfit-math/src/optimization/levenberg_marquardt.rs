//! Levenberg-Marquardt with box constraints.

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

use super::{Bounds, LevenbergMarquardtConfig, OptimizationResult, Termination};
use crate::error::{MathError, MathResult};

/// Cost below which residuals are considered identically zero.
const EXACT_FIT_COST: f64 = 1e-30;

/// Minimises `Σ r_i(x)²` by Levenberg-Marquardt.
///
/// The Jacobian is taken by central differences. Each trial step solves
/// `(JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr` and is projected back into `bounds`, so
/// parameters never leave the box. A parameter sitting on a bound whose
/// descent direction points out of the box is held fixed for that
/// iteration. Accepted steps shrink λ; rejected steps grow it until the
/// step is accepted or λ exceeds `max_lambda`, at which point the current
/// point is stationary within the bounds.
///
/// # Errors
///
/// - `MathError::InsufficientData` if there are fewer residuals than parameters
/// - `MathError::InvalidInput` if the residuals are non-finite at the start
/// - `MathError::ConvergenceFailed` if `max_iterations` is exhausted
///
/// # Example
///
/// ```rust
/// use yieldfit_math::optimization::{levenberg_marquardt, LevenbergMarquardtConfig};
///
/// // Fit y = a * exp(b * x)
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys: Vec<f64> = xs.iter().map(|x: &f64| 2.0 * (0.5 * x).exp()).collect();
/// let residuals = |p: &[f64]| -> Vec<f64> {
///     xs.iter().zip(&ys).map(|(x, y)| p[0] * (p[1] * x).exp() - y).collect()
/// };
///
/// let result = levenberg_marquardt(residuals, &[1.0, 0.1], None, &LevenbergMarquardtConfig::default()).unwrap();
/// assert!((result.parameters[0] - 2.0).abs() < 1e-6);
/// assert!((result.parameters[1] - 0.5).abs() < 1e-6);
/// ```
pub fn levenberg_marquardt<F>(
    residuals: F,
    initial: &[f64],
    bounds: Option<&Bounds>,
    config: &LevenbergMarquardtConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = initial.len();
    if let Some(b) = bounds {
        if b.len() != n {
            return Err(MathError::DimensionMismatch {
                expected: n,
                actual: b.len(),
            });
        }
    }

    let mut x = initial.to_vec();
    if let Some(b) = bounds {
        b.project(&mut x);
    }

    let mut r = DVector::from_vec(residuals(&x));
    if r.len() < n {
        return Err(MathError::insufficient_data(n, r.len()));
    }
    if r.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(
            "residuals are not finite at the initial point",
        ));
    }
    let mut cost = r.norm_squared();
    let mut lambda = config.initial_lambda;

    let finish = |parameters: Vec<f64>,
                  cost: f64,
                  iterations: u32,
                  termination: Termination|
     -> MathResult<OptimizationResult> {
        debug!(
            "levenberg-marquardt stopped after {iterations} iterations: {termination:?}, cost {cost:.3e}"
        );
        Ok(OptimizationResult {
            parameters,
            objective_value: cost,
            iterations,
            termination,
        })
    };

    for iteration in 0..config.max_iterations {
        if cost < EXACT_FIT_COST {
            return finish(x, cost, iteration, Termination::ExactFit);
        }

        let jacobian = central_jacobian(&residuals, &x, r.len(), config.jacobian_step);
        let mut gradient = jacobian.tr_mul(&r);
        let mut normal = jacobian.tr_mul(&jacobian);

        // Parameters pinned at a bound with the descent direction pointing
        // outside are frozen for this iteration.
        let active: Vec<usize> = match bounds {
            Some(b) => (0..n)
                .filter(|&j| {
                    (x[j] <= b.lower()[j] && gradient[j] > 0.0)
                        || (x[j] >= b.upper()[j] && gradient[j] < 0.0)
                })
                .collect(),
            None => Vec::new(),
        };
        for &j in &active {
            normal.row_mut(j).fill(0.0);
            normal.column_mut(j).fill(0.0);
            normal[(j, j)] = 1.0;
            gradient[j] = 0.0;
        }

        if gradient.amax() < config.gradient_tolerance {
            return finish(x, cost, iteration, Termination::GradientTolerance);
        }

        loop {
            let mut damped = normal.clone();
            for i in 0..n {
                damped[(i, i)] += lambda * normal[(i, i)].max(1e-12);
            }

            let Some(delta) = damped.cholesky().map(|c| c.solve(&(-&gradient))) else {
                lambda *= config.lambda_factor;
                if lambda > config.max_lambda {
                    return finish(x, cost, iteration, Termination::Stationary);
                }
                continue;
            };

            let mut candidate: Vec<f64> = x.iter().zip(delta.iter()).map(|(a, d)| a + d).collect();
            if let Some(b) = bounds {
                b.project(&mut candidate);
            }

            let step = x
                .iter()
                .zip(&candidate)
                .map(|(a, c)| (c - a) * (c - a))
                .sum::<f64>()
                .sqrt();
            let x_norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            if step < config.step_tolerance * (x_norm + config.step_tolerance) {
                return finish(x, cost, iteration, Termination::StepTolerance);
            }

            let r_candidate = DVector::from_vec(residuals(&candidate));
            let cost_candidate = r_candidate.norm_squared();

            if cost_candidate.is_finite() && cost_candidate < cost {
                let reduction = (cost - cost_candidate) / cost.max(f64::MIN_POSITIVE);
                x = candidate;
                r = r_candidate;
                cost = cost_candidate;
                lambda = (lambda / config.lambda_factor).max(config.min_lambda);

                if reduction < config.cost_tolerance || cost < EXACT_FIT_COST {
                    return finish(x, cost, iteration + 1, Termination::CostTolerance);
                }
                break;
            }

            trace!("rejected step at iteration {iteration}: cost {cost_candidate:.3e} >= {cost:.3e}, lambda {lambda:.1e}");
            lambda *= config.lambda_factor;
            if lambda > config.max_lambda {
                return finish(x, cost, iteration, Termination::Stationary);
            }
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, cost))
}

fn central_jacobian<F>(residuals: &F, x: &[f64], m: usize, relative_step: f64) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = x.len();
    let mut jacobian = DMatrix::zeros(m, n);
    let mut probe = x.to_vec();

    for j in 0..n {
        let h = relative_step * x[j].abs().max(1.0);

        probe[j] = x[j] + h;
        let up = residuals(&probe);
        probe[j] = x[j] - h;
        let down = residuals(&probe);
        probe[j] = x[j];

        for i in 0..m {
            jacobian[(i, j)] = (up[i] - down[i]) / (2.0 * h);
        }
    }

    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_problem_solved_exactly() {
        // y = 1 + 2x
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let residuals =
            |p: &[f64]| -> Vec<f64> { xs.iter().map(|x| p[0] + p[1] * x - (1.0 + 2.0 * x)).collect() };

        let result =
            levenberg_marquardt(residuals, &[0.0, 0.0], None, &LevenbergMarquardtConfig::default())
                .unwrap();

        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(result.parameters[1], 2.0, epsilon = 1e-8);
        assert!(result.objective_value < 1e-16);
    }

    #[test]
    fn test_rosenbrock_as_least_squares() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]] };

        let result =
            levenberg_marquardt(residuals, &[-1.2, 1.0], None, &LevenbergMarquardtConfig::default())
                .unwrap();

        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_active_bound_is_respected() {
        // Unconstrained optimum at x = -2, box is [0, 5]
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] + 2.0, 0.0] };
        let bounds = Bounds::new(vec![0.0], vec![5.0]).unwrap();

        let result = levenberg_marquardt(
            residuals,
            &[3.0],
            Some(&bounds),
            &LevenbergMarquardtConfig::default(),
        )
        .unwrap();

        assert!(result.parameters[0] >= 0.0);
        assert_relative_eq!(result.parameters[0], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_pinned_parameter_does_not_stall_the_others() {
        // Unconstrained optimum (-2, -1); with p1 >= 0 the optimum is (0, 0)
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] - 2.0 * p[1], p[1] + 1.0] };
        let bounds = Bounds::new(vec![f64::NEG_INFINITY, 0.0], vec![f64::INFINITY, 10.0]).unwrap();

        let result = levenberg_marquardt(
            residuals,
            &[5.0, 5.0],
            Some(&bounds),
            &LevenbergMarquardtConfig::default(),
        )
        .unwrap();

        assert_relative_eq!(result.parameters[0], 0.0, epsilon = 1e-8);
        assert_relative_eq!(result.parameters[1], 0.0);
        assert_relative_eq!(result.objective_value, 1.0, epsilon = 1e-12);
        assert!(result.iterations < 20);
    }

    #[test]
    fn test_too_few_residuals() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![p[0] + p[1]] };
        let result =
            levenberg_marquardt(residuals, &[0.0, 0.0], None, &LevenbergMarquardtConfig::default());
        assert!(matches!(result, Err(MathError::InsufficientData { .. })));
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let residuals = |p: &[f64]| -> Vec<f64> { vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]] };
        let config = LevenbergMarquardtConfig::default().with_max_iterations(2);

        let result = levenberg_marquardt(residuals, &[-1.2, 1.0], None, &config);
        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 2, .. })
        ));
    }
}
