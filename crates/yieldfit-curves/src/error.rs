//! Error types for curve fitting.

use thiserror::Error;

use yieldfit_bonds::BondError;
use yieldfit_core::{CoreError, Date};
use yieldfit_math::MathError;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised while building, fitting, or querying a yield curve.
///
/// A failed fit never leaves partial parameters behind: the model keeps
/// whatever state it had before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Fewer observations than the model has free parameters.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Observations required.
        required: usize,
        /// Observations supplied.
        actual: usize,
    },

    /// The design matrix of a linear fit is rank deficient.
    #[error("Singular fit: design matrix has rank {rank}, need {required}")]
    SingularFit {
        /// Numerical rank.
        rank: usize,
        /// Number of coefficients.
        required: usize,
    },

    /// A nonlinear fit exhausted its iteration budget.
    #[error("Fit did not converge after {iterations} iterations (cost: {residual:.2e})")]
    NoConvergence {
        /// Iterations attempted.
        iterations: u32,
        /// Sum of squared residuals at the last iterate.
        residual: f64,
    },

    /// A model or curve parameter violates its constraint.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Bonds and observed yields differ in length.
    #[error("Length mismatch: {bonds} bonds but {yields} yields")]
    LengthMismatch {
        /// Number of bonds.
        bonds: usize,
        /// Number of observed yields.
        yields: usize,
    },

    /// A query date on or before the settlement date.
    #[error("Invalid date: {date} is not after settlement {settlement}")]
    InvalidDate {
        /// Requested date.
        date: Date,
        /// Curve settlement date.
        settlement: Date,
    },

    /// The model has not been fitted.
    #[error("{model} model has not been fitted")]
    NotFitted {
        /// Model name.
        model: &'static str,
    },

    /// Bond error (including settlement on or after a bond's maturity).
    #[error("Bond error: {0}")]
    Bond(#[from] BondError),

    /// Date or day count error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Numerical error with no curve-level meaning.
    #[error("Math error: {0}")]
    Math(MathError),
}

impl CurveError {
    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::SingularMatrix { rank, required } => Self::SingularFit { rank, required },
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::NoConvergence {
                iterations,
                residual,
            },
            MathError::InsufficientData { required, actual } => {
                Self::InsufficientData { required, actual }
            }
            other => Self::Math(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_errors_map_onto_fit_errors() {
        assert_eq!(
            CurveError::from(MathError::SingularMatrix {
                rank: 3,
                required: 4
            }),
            CurveError::SingularFit {
                rank: 3,
                required: 4
            }
        );
        assert!(matches!(
            CurveError::from(MathError::convergence_failed(500, 1e-3)),
            CurveError::NoConvergence {
                iterations: 500,
                ..
            }
        ));
        assert_eq!(
            CurveError::from(MathError::insufficient_data(6, 4)),
            CurveError::insufficient_data(6, 4)
        );
        assert!(matches!(
            CurveError::from(MathError::invalid_input("x")),
            CurveError::Math(_)
        ));
    }

    #[test]
    fn test_error_display() {
        let err = CurveError::LengthMismatch {
            bonds: 10,
            yields: 9,
        };
        assert_eq!(err.to_string(), "Length mismatch: 10 bonds but 9 yields");

        let err = CurveError::invalid_parameter("tau", "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter tau: must be positive");
    }
}
