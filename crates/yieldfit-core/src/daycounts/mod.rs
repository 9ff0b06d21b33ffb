//! Day count conventions for accrual and discounting.
//!
//! A day count convention turns a `(start, end)` date pair into a year
//! fraction. Every convention rejects `start > end` with
//! [`CoreError::InvalidInterval`].
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`ActActIsda`]: Actual/Actual ISDA
//! - [`ActActIcma`]: Actual/Actual ICMA, period based (government bonds)
//! - [`Thirty360US`]: 30/360 US (Bond Basis)
//! - [`Thirty360E`]: 30E/360 (Eurobond Basis)
//!
//! # Usage
//!
//! ```rust
//! use yieldfit_core::daycounts::{DayCountConvention, ReferencePeriod};
//! use yieldfit_core::types::{Date, Frequency};
//!
//! let period = ReferencePeriod::new(
//!     Date::from_ymd(2012, 9, 7).unwrap(),
//!     Date::from_ymd(2013, 3, 7).unwrap(),
//!     Frequency::SemiAnnual,
//! );
//! let settle = Date::from_ymd(2012, 9, 19).unwrap();
//!
//! let accrual = DayCountConvention::ActActIcma
//!     .accrual_fraction(period.start, settle, &period)
//!     .unwrap();
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::{ActActIcma, ActActIsda};
pub use thirty360::{Thirty360E, Thirty360US};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Frequency};

/// Trait for day count conventions.
pub trait DayCount: Send + Sync {
    /// Returns the market name of the convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInterval` if `start > end`.
    fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal>;

    /// Calculates the day count between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

pub(crate) fn ensure_ordered(start: Date, end: Date) -> CoreResult<()> {
    if start > end {
        return Err(CoreError::invalid_interval(start, end));
    }
    Ok(())
}

/// The coupon period enclosing an accrual, needed by ACT/ACT ICMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePeriod {
    /// Start of the coupon period.
    pub start: Date,
    /// End of the coupon period.
    pub end: Date,
    /// Coupon frequency of the instrument.
    pub frequency: Frequency,
}

impl ReferencePeriod {
    /// Creates a reference period.
    #[must_use]
    pub fn new(start: Date, end: Date, frequency: Frequency) -> Self {
        Self {
            start,
            end,
            frequency,
        }
    }
}

/// Enumeration of the supported day count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,

    /// Actual/365 Fixed
    #[default]
    Act365Fixed,

    /// Actual/Actual ISDA
    ActActIsda,

    /// Actual/Actual ICMA, measured against the enclosing coupon period
    ActActIcma,

    /// 30/360 US (Bond Basis)
    Thirty360US,

    /// 30E/360 (Eurobond Basis)
    Thirty360E,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    ///
    /// ACT/ACT ICMA is built with the given frequency; the other
    /// conventions ignore it.
    #[must_use]
    pub fn to_day_count(&self, frequency: Frequency) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::ActActIcma => Box::new(ActActIcma::new(frequency)),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::ActActIcma => "ACT/ACT ICMA",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::ActActIcma,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
        ]
    }

    /// Year fraction between two dates without coupon period context.
    pub fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal> {
        self.to_day_count(Frequency::default())
            .year_fraction(start, end)
    }

    /// Accrual fraction of `start..end`, a sub-interval of a coupon period.
    ///
    /// ACT/ACT ICMA measures the interval against `period`; every other
    /// convention returns its plain year fraction.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInterval` if `start > end`, and
    /// `CoreError::InvalidPeriod` for an empty ICMA reference period.
    pub fn accrual_fraction(
        &self,
        start: Date,
        end: Date,
        period: &ReferencePeriod,
    ) -> CoreResult<Decimal> {
        match self {
            DayCountConvention::ActActIcma => ActActIcma::new(period.frequency)
                .year_fraction_with_period(start, end, period.start, period.end),
            other => other.year_fraction(start, end),
        }
    }

    /// Accrual fraction as `f64`, for solver code.
    ///
    /// # Errors
    ///
    /// Fails like [`accrual_fraction`](Self::accrual_fraction), and with
    /// `CoreError::NotRepresentable` if the fraction has no `f64` value.
    pub fn accrual_fraction_f64(
        &self,
        start: Date,
        end: Date,
        period: &ReferencePeriod,
    ) -> CoreResult<f64> {
        use rust_decimal::prelude::ToPrimitive;

        let fraction = self.accrual_fraction(start, end, period)?;
        fraction
            .to_f64()
            .ok_or_else(|| CoreError::not_representable(fraction))
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a convention from its market name or a common alias,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),

            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACT365FIXED"
            | "ACT365" | "ACT_365" => Ok(DayCountConvention::Act365Fixed),

            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTACTISDA" | "ACT_ACT_ISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }

            "ACT/ACT ICMA" | "ACTUAL/ACTUAL ICMA" | "ACTACTICMA" | "ACT_ACT_ICMA" | "ISMA" => {
                Ok(DayCountConvention::ActActIcma)
            }

            "30/360" | "30/360 US" | "30U/360" | "BOND" | "THIRTY360US" => {
                Ok(DayCountConvention::Thirty360US)
            }

            "30E/360" | "30/360 ICMA" | "EUROBOND" | "THIRTY360E" => {
                Ok(DayCountConvention::Thirty360E)
            }

            _ => Err(CoreError::UnknownDayCount {
                name: s.to_string(),
            }),
        }
    }
}
