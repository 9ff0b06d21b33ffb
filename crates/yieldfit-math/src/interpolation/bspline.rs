//! Clamped B-spline basis.

use crate::error::{MathError, MathResult};

/// A clamped B-spline basis of a given degree over `[lower, upper]`.
///
/// The full knot vector repeats each end point `degree + 1` times around
/// the caller's interior knots, so the basis has
/// `interior.len() + degree + 1` functions and sums to one everywhere.
/// Points outside `[lower, upper]` are evaluated on the end polynomial
/// pieces.
///
/// # Example
///
/// ```rust
/// use yieldfit_math::interpolation::BSplineBasis;
///
/// let basis = BSplineBasis::clamped(3, &[1.0, 3.0, 5.0, 10.0], 0.5, 15.0).unwrap();
/// assert_eq!(basis.len(), 8);
///
/// let row = basis.evaluate(4.0);
/// assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineBasis {
    degree: usize,
    knots: Vec<f64>,
}

impl BSplineBasis {
    /// Builds a clamped basis from strictly increasing interior knots lying
    /// strictly inside `(lower, upper)`.
    pub fn clamped(degree: usize, interior: &[f64], lower: f64, upper: f64) -> MathResult<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(MathError::invalid_input(format!(
                "basis domain [{lower}, {upper}] is empty"
            )));
        }
        if interior.iter().any(|k| !k.is_finite()) {
            return Err(MathError::invalid_input("knots must be finite"));
        }
        if interior.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MathError::invalid_input("knots must be strictly increasing"));
        }
        if let Some(k) = interior.iter().find(|&&k| k <= lower || k >= upper) {
            return Err(MathError::invalid_input(format!(
                "knot {k} lies outside ({lower}, {upper})"
            )));
        }

        let mut knots = Vec::with_capacity(interior.len() + 2 * (degree + 1));
        knots.extend(std::iter::repeat(lower).take(degree + 1));
        knots.extend_from_slice(interior);
        knots.extend(std::iter::repeat(upper).take(degree + 1));

        Ok(Self { degree, knots })
    }

    /// Polynomial degree of each piece.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The full clamped knot vector.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Number of basis functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Always false: a clamped basis has at least `degree + 1` functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index `i` of the non-empty knot span `[t_i, t_{i+1})` used for `x`,
    /// clamped to the first and last spans.
    fn span(&self, x: f64) -> usize {
        let p = self.degree;
        let n = self.len();

        if x >= self.knots[n] {
            return n - 1;
        }
        if x <= self.knots[p] {
            return p;
        }
        // Largest i in [p, n - 1] with t_i <= x
        let upper = self.knots[p + 1..n].partition_point(|&k| k <= x);
        p + upper
    }

    /// Values of every basis function at `x`.
    ///
    /// Only `degree + 1` entries are non-zero.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> Vec<f64> {
        let p = self.degree;
        let i = self.span(x);
        let t = &self.knots;

        let mut values = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];
        values[0] = 1.0;

        for j in 1..=p {
            left[j] = x - t[i + 1 - j];
            right[j] = t[i + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = values[r] / (right[r + 1] + left[j - r]);
                values[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            values[j] = saved;
        }

        let mut row = vec![0.0; self.len()];
        row[i - p..=i].copy_from_slice(&values);
        row
    }

    /// Evaluates `Σ c_j B_j(x)`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::DimensionMismatch` if `coefficients` does not
    /// have one entry per basis function.
    pub fn combine(&self, coefficients: &[f64], x: f64) -> MathResult<f64> {
        if coefficients.len() != self.len() {
            return Err(MathError::DimensionMismatch {
                expected: self.len(),
                actual: coefficients.len(),
            });
        }
        Ok(self
            .evaluate(x)
            .iter()
            .zip(coefficients)
            .map(|(b, c)| b * c)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn gilt_basis() -> BSplineBasis {
        BSplineBasis::clamped(3, &[1.0, 3.0, 5.0, 10.0], 0.5, 15.0).unwrap()
    }

    #[test]
    fn test_clamped_knot_vector() {
        let basis = gilt_basis();
        assert_eq!(
            basis.knots(),
            &[0.5, 0.5, 0.5, 0.5, 1.0, 3.0, 5.0, 10.0, 15.0, 15.0, 15.0, 15.0]
        );
        assert_eq!(basis.len(), 8);
        assert_eq!(basis.degree(), 3);
    }

    #[test]
    fn test_end_points_interpolate_end_coefficients() {
        let basis = gilt_basis();

        let first = basis.evaluate(0.5);
        assert_relative_eq!(first[0], 1.0);
        assert!(first[1..].iter().all(|&v| v == 0.0));

        let last = basis.evaluate(15.0);
        assert_relative_eq!(last[7], 1.0);
    }

    #[test]
    fn test_linear_basis_is_hat_functions() {
        let basis = BSplineBasis::clamped(1, &[4.0, 5.0, 6.0, 7.0], 0.5, 20.0).unwrap();
        let row = basis.evaluate(5.5);
        assert_relative_eq!(row[2], 0.5);
        assert_relative_eq!(row[3], 0.5);
        assert_eq!(row.iter().filter(|&&v| v != 0.0).count(), 2);
    }

    #[test]
    fn test_reproduces_polynomials_of_lower_degree() {
        // Greville abscissae reproduce linear functions exactly
        let basis = gilt_basis();
        let t = basis.knots();
        let greville: Vec<f64> = (0..basis.len())
            .map(|j| (t[j + 1] + t[j + 2] + t[j + 3]) / 3.0)
            .collect();

        for x in [0.5, 2.0, 7.5, 15.0, 18.0] {
            assert_relative_eq!(basis.combine(&greville, x).unwrap(), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_knots() {
        assert!(BSplineBasis::clamped(3, &[1.0, 1.0], 0.0, 2.0).is_err());
        assert!(BSplineBasis::clamped(3, &[3.0, 2.0], 0.0, 5.0).is_err());
        assert!(BSplineBasis::clamped(3, &[0.0, 2.0], 0.0, 5.0).is_err());
        assert!(BSplineBasis::clamped(3, &[2.0, 6.0], 0.0, 5.0).is_err());
        assert!(BSplineBasis::clamped(3, &[], 1.0, 1.0).is_err());
    }

    #[test]
    fn test_combine_checks_length() {
        let basis = gilt_basis();
        assert!(matches!(
            basis.combine(&[1.0; 3], 1.0),
            Err(MathError::DimensionMismatch { expected: 8, actual: 3 })
        ));
    }

    proptest! {
        #[test]
        fn prop_partition_of_unity(x in -5.0f64..40.0) {
            let row = gilt_basis().evaluate(x);
            prop_assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_non_negative_inside_domain(x in 0.5f64..15.0) {
            let row = gilt_basis().evaluate(x);
            prop_assert!(row.iter().all(|&v| v >= -1e-15));
        }
    }
}
