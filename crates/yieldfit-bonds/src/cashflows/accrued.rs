//! Accrued interest.

use rust_decimal::Decimal;

use yieldfit_core::daycounts::{DayCountConvention, ReferencePeriod};
use yieldfit_core::{CoreResult, Date};

/// Accrued interest from the start of `period` to `settlement`.
///
/// `face × coupon_rate × accrual_fraction(period.start, settlement)`. Under
/// ACT/ACT ICMA this is the period coupon times the fraction of the period
/// elapsed.
///
/// # Example
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use yieldfit_bonds::cashflows::accrued_interest;
/// use yieldfit_core::daycounts::{DayCountConvention, ReferencePeriod};
/// use yieldfit_core::{Date, Frequency};
///
/// let period = ReferencePeriod::new(
///     Date::from_ymd(2025, 1, 15).unwrap(),
///     Date::from_ymd(2025, 7, 15).unwrap(),
///     Frequency::SemiAnnual,
/// );
/// let settle = Date::from_ymd(2025, 4, 15).unwrap();
///
/// let accrued = accrued_interest(settle, &period, dec!(0.05), dec!(100), DayCountConvention::Thirty360US).unwrap();
/// assert_eq!(accrued, dec!(1.25));
/// ```
pub fn accrued_interest(
    settlement: Date,
    period: &ReferencePeriod,
    coupon_rate: Decimal,
    face_value: Decimal,
    day_count: DayCountConvention,
) -> CoreResult<Decimal> {
    let fraction = day_count.accrual_fraction(period.start, settlement, period)?;
    Ok(face_value * coupon_rate * fraction)
}
