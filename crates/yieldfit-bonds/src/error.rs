//! Error types for bond operations.

use thiserror::Error;

use yieldfit_core::{CoreError, Date};
use yieldfit_math::MathError;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Missing required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Settlement on or after maturity.
    #[error("Invalid settlement: {settlement} is not before maturity {maturity}")]
    InvalidSettlement {
        /// Settlement date.
        settlement: Date,
        /// Maturity date.
        maturity: Date,
    },

    /// Invalid price.
    #[error("Invalid price: {reason}")]
    InvalidPrice {
        /// Description of what's invalid.
        reason: String,
    },

    /// The yield solver did not meet its price tolerance.
    #[error("Yield did not converge after {iterations} iterations (price error: {residual:.2e})")]
    NoConvergence {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final price error.
        residual: f64,
    },

    /// Date or day count error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Numerical error not covered above.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl BondError {
    /// Creates an invalid specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(reason: impl Into<String>) -> Self {
        Self::InvalidPrice {
            reason: reason.into(),
        }
    }

    /// Maps a root-finder failure onto the bond taxonomy.
    ///
    /// A price outside the solver bracket is reported as non-convergence.
    #[must_use]
    pub fn from_solver(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::NoConvergence {
                iterations,
                residual,
            },
            MathError::InvalidBracket { fa, .. } => Self::NoConvergence {
                iterations: 0,
                residual: fa,
            },
            other => Self::Math(other),
        }
    }
}
