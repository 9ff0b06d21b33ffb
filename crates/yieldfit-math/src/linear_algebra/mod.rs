//! Linear least squares.
//!
//! Design matrices for polynomial and spline fits are tall and can be badly
//! scaled (`t^5` against a column of ones), so the solve goes through an SVD
//! and the numerical rank is checked explicitly rather than trusting the
//! normal equations.

use log::trace;
use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Solves `min ||A x - b||²` for a tall design matrix `A`.
///
/// `rank_tolerance` is relative to the largest singular value; `None` uses
/// `max(rows, cols) * f64::EPSILON`.
///
/// # Errors
///
/// - `MathError::DimensionMismatch` if `b` does not have one entry per row
/// - `MathError::InsufficientData` if `A` has fewer rows than columns
/// - `MathError::SingularMatrix` if `A` is rank deficient
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use yieldfit_math::linear_algebra::least_squares;
///
/// // y = 2 + 3x on x = [0, 1, 2]
/// let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = DVector::from_row_slice(&[2.0, 5.0, 8.0]);
///
/// let x = least_squares(&a, &b, None).unwrap();
/// assert!((x[0] - 2.0).abs() < 1e-10);
/// assert!((x[1] - 3.0).abs() < 1e-10);
/// ```
pub fn least_squares(
    design: &DMatrix<f64>,
    rhs: &DVector<f64>,
    rank_tolerance: Option<f64>,
) -> MathResult<DVector<f64>> {
    let (rows, cols) = design.shape();

    if rhs.len() != rows {
        return Err(MathError::DimensionMismatch {
            expected: rows,
            actual: rhs.len(),
        });
    }
    if cols == 0 {
        return Err(MathError::invalid_input("design matrix has no columns"));
    }
    if rows < cols {
        return Err(MathError::insufficient_data(cols, rows));
    }
    if design.iter().chain(rhs.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("design matrix contains non-finite values"));
    }

    let svd = design.clone().svd(true, true);
    let sigma_max = svd.singular_values.max();
    let relative = rank_tolerance.unwrap_or(rows.max(cols) as f64 * f64::EPSILON);
    let cutoff = relative * sigma_max;
    let rank = svd
        .singular_values
        .iter()
        .filter(|&&s| sigma_max > 0.0 && s > cutoff)
        .count();

    trace!("least squares {rows}x{cols}: rank {rank}, sigma_max {sigma_max:.3e}");

    if rank < cols {
        return Err(MathError::SingularMatrix {
            rank,
            required: cols,
        });
    }

    svd.solve(rhs, cutoff)
        .map_err(|e| MathError::invalid_input(format!("SVD solve failed: {e}")))
}
