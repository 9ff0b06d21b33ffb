//! Actual/365 Fixed day count convention.

use rust_decimal::Decimal;

use super::{ensure_ordered, DayCount};
use crate::error::CoreResult;
use crate::types::Date;

/// Actual/365 Fixed day count convention.
///
/// The denominator is always 365, regardless of leap years. Also the
/// default time basis for converting curve dates into maturities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal> {
        ensure_ordered(start, end)?;
        Ok(Decimal::from(self.day_count(start, end)) / Decimal::from(365))
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
