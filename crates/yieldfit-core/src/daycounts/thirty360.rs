//! 30/360 day count conventions.

use rust_decimal::Decimal;

use super::{ensure_ordered, DayCount};
use crate::error::CoreResult;
use crate::types::Date;

#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

#[inline]
fn thirty_day_count(start: Date, end: Date, d1: i64, d2: i64) -> i64 {
    let y1 = start.year() as i64;
    let y2 = end.year() as i64;
    let m1 = start.month() as i64;
    let m2 = end.month() as i64;

    360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
}

/// 30/360 US day count convention (Bond Basis).
///
/// # Rules
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February and D1 was too, change D2 to 30
/// 4. If D2 is 31 and D1 is now >= 30, change D2 to 30
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal> {
        ensure_ordered(start, end)?;
        Ok(Decimal::from(self.day_count(start, end)) / Decimal::from(360))
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let mut d1 = start.day() as i64;
        let mut d2 = end.day() as i64;

        let d1_was_feb_eom = is_last_day_of_february(start);
        if d1_was_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if is_last_day_of_february(end) && d1_was_feb_eom {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        thirty_day_count(start, end, d1, d2)
    }
}

/// 30E/360 day count convention (Eurobond Basis).
///
/// Day 31 becomes 30 on both ends; no February adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> CoreResult<Decimal> {
        ensure_ordered(start, end)?;
        Ok(Decimal::from(self.day_count(start, end)) / Decimal::from(360))
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = (start.day() as i64).min(30);
        let d2 = (end.day() as i64).min(30);
        thirty_day_count(start, end, d1, d2)
    }
}
