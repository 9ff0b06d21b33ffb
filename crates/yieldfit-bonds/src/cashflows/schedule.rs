//! Coupon date generation.

use yieldfit_core::daycounts::ReferencePeriod;
use yieldfit_core::{CoreResult, Date, Frequency};

/// Coupon dates of a bullet bond as seen from a settlement date.
///
/// Dates are rolled backward from maturity in whole coupon periods, each
/// one computed directly from maturity so end-of-month clamping never
/// accumulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponSchedule {
    previous: Date,
    remaining: Vec<Date>,
    frequency: Frequency,
}

impl CouponSchedule {
    /// Builds the schedule for `settlement < maturity`.
    pub fn generate(maturity: Date, frequency: Frequency, settlement: Date) -> CoreResult<Self> {
        let months = frequency.months_per_period() as i32;

        let mut remaining = Vec::new();
        let mut periods_back = 0;
        let previous = loop {
            let date = maturity.add_months(-periods_back * months)?;
            if date <= settlement {
                break date;
            }
            remaining.push(date);
            periods_back += 1;
        };
        remaining.reverse();

        Ok(Self {
            previous,
            remaining,
            frequency,
        })
    }

    /// Last coupon date on or before settlement (quasi-coupon date before issue).
    #[must_use]
    pub fn previous_coupon(&self) -> Date {
        self.previous
    }

    /// First coupon date strictly after settlement.
    #[must_use]
    pub fn next_coupon(&self) -> Option<Date> {
        self.remaining.first().copied()
    }

    /// Coupon dates strictly after settlement, ascending, ending at maturity.
    #[must_use]
    pub fn remaining(&self) -> &[Date] {
        &self.remaining
    }

    /// The coupon period containing settlement.
    #[must_use]
    pub fn current_period(&self) -> Option<ReferencePeriod> {
        self.next_coupon()
            .map(|next| ReferencePeriod::new(self.previous, next, self.frequency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_semi_annual_schedule() {
        let schedule =
            CouponSchedule::generate(date(2015, 12, 7), Frequency::SemiAnnual, date(2012, 9, 19))
                .unwrap();

        assert_eq!(schedule.previous_coupon(), date(2012, 6, 7));
        assert_eq!(schedule.next_coupon(), Some(date(2012, 12, 7)));
        assert_eq!(schedule.remaining().len(), 7);
        assert_eq!(schedule.remaining().last(), Some(&date(2015, 12, 7)));
    }

    #[test]
    fn test_settlement_on_coupon_date() {
        let schedule =
            CouponSchedule::generate(date(2014, 3, 7), Frequency::SemiAnnual, date(2013, 3, 7))
                .unwrap();

        assert_eq!(schedule.previous_coupon(), date(2013, 3, 7));
        assert_eq!(schedule.remaining(), &[date(2013, 9, 7), date(2014, 3, 7)]);
    }

    #[test]
    fn test_end_of_month_does_not_drift() {
        let schedule =
            CouponSchedule::generate(date(2026, 8, 31), Frequency::Quarterly, date(2025, 9, 15))
                .unwrap();

        assert_eq!(
            schedule.remaining(),
            &[
                date(2025, 11, 30),
                date(2026, 2, 28),
                date(2026, 5, 31),
                date(2026, 8, 31)
            ]
        );
        assert_eq!(schedule.previous_coupon(), date(2025, 8, 31));
    }

    #[test]
    fn test_current_period() {
        let schedule =
            CouponSchedule::generate(date(2020, 1, 15), Frequency::Annual, date(2019, 6, 1))
                .unwrap();
        let period = schedule.current_period().unwrap();
        assert_eq!(period.start, date(2019, 1, 15));
        assert_eq!(period.end, date(2020, 1, 15));
        assert_eq!(period.frequency, Frequency::Annual);
    }
}
