//! Actual/Actual day count conventions.

use rust_decimal::Decimal;

use super::{ensure_ordered, DayCount};
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Frequency};

/// Actual/Actual ISDA day count convention.
///
/// Splits the interval into the portions falling in leap and non-leap years.
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap year}}{365} + \frac{\text{Days in leap year}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal> {
        ensure_ordered(start, end)?;

        let mut total = Decimal::ZERO;
        let mut current = start;

        while current.year() < end.year() {
            let next_year = Date::from_ymd(current.year() + 1, 1, 1)?;
            let days = current.days_between(&next_year);
            total += Decimal::from(days) / Decimal::from(current.days_in_year());
            current = next_year;
        }

        let days = current.days_between(&end);
        total += Decimal::from(days) / Decimal::from(current.days_in_year());

        Ok(total)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ICMA day count convention.
///
/// The year fraction depends on the coupon frequency and the actual
/// length of the enclosing coupon period:
///
/// $$\text{Year Fraction} = \frac{\text{Days}}{\text{Frequency} \times \text{Days in Period}}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIcma {
    frequency: Frequency,
}

impl ActActIcma {
    /// Creates a new ACT/ACT ICMA convention with the given coupon frequency.
    #[must_use]
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }

    /// Returns the coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Calculates the year fraction of `start..end` inside the coupon
    /// period `period_start..period_end`.
    pub fn year_fraction_with_period(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
    ) -> CoreResult<Decimal> {
        ensure_ordered(start, end)?;

        let days_in_period = period_start.days_between(&period_end);
        if days_in_period <= 0 {
            return Err(CoreError::invalid_period(
                period_start,
                period_end,
                "coupon period must have positive length",
            ));
        }

        let accrued_days = start.days_between(&end);
        Ok(Decimal::from(accrued_days)
            / (Decimal::from(self.frequency.periods_per_year()) * Decimal::from(days_in_period)))
    }
}

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT ICMA"
    }

    /// Without a reference period the fraction is approximated as ACT/365.
    /// Bond accruals go through [`ActActIcma::year_fraction_with_period`].
    fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal> {
        ensure_ordered(start, end)?;
        Ok(Decimal::from(start.days_between(&end)) / Decimal::from(365))
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
