//! Error types for the core crate.

use thiserror::Error;

use crate::types::Date;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date arithmetic and day count calculations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A calendar date could not be constructed or parsed.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// An accrual interval whose start lies after its end.
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval {
        /// Interval start.
        start: Date,
        /// Interval end.
        end: Date,
    },

    /// A coupon period that cannot support an ICMA accrual.
    #[error("Invalid reference period {start} to {end}: {reason}")]
    InvalidPeriod {
        /// Period start.
        start: Date,
        /// Period end.
        end: Date,
        /// Why the period was rejected.
        reason: String,
    },

    /// A decimal quantity with no `f64` equivalent.
    #[error("Value {value} cannot be represented as f64")]
    NotRepresentable {
        /// The value, as text.
        value: String,
    },

    /// Unrecognised day count convention name.
    #[error("Unknown day count convention: '{name}'")]
    UnknownDayCount {
        /// The name that failed to parse.
        name: String,
    },

    /// Unrecognised coupon frequency name.
    #[error("Unknown frequency: '{name}'")]
    UnknownFrequency {
        /// The name that failed to parse.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid interval error.
    #[must_use]
    pub fn invalid_interval(start: Date, end: Date) -> Self {
        Self::InvalidInterval { start, end }
    }

    /// Creates an invalid reference period error.
    #[must_use]
    pub fn invalid_period(start: Date, end: Date, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Creates a not representable error.
    #[must_use]
    pub fn not_representable(value: impl std::fmt::Display) -> Self {
        Self::NotRepresentable {
            value: value.to_string(),
        }
    }
}
