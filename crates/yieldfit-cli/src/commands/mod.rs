//! CLI command implementations.

pub mod fit;
pub mod ytm;

pub use fit::FitArgs;
pub use ytm::YtmArgs;

use rust_decimal::Decimal;
use yieldfit_core::daycounts::DayCountConvention;
use yieldfit_core::{Date, Frequency};

use crate::error::{CliError, CliResult};

/// Day-first format used by the gilt price tables, e.g. `07-Mar-13`.
const SHORT_DATE_FORMAT: &str = "%d-%b-%y";

/// Parses a date in YYYY-MM-DD or DD-Mon-YY format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s)
        .or_else(|_| Date::parse_with_format(s, SHORT_DATE_FORMAT))
        .map_err(|_| CliError::InvalidDate(s.trim().to_string()))
}

/// Parses a coupon frequency name or payments-per-year count.
pub fn parse_frequency(s: &str) -> CliResult<Frequency> {
    s.parse().map_err(|e| CliError::Config(format!("{e}")))
}

/// Parses a day count name such as `ACT/ACT ICMA` or `30/360`.
pub fn parse_day_count(s: &str) -> CliResult<DayCountConvention> {
    s.parse().map_err(|e| CliError::Config(format!("{e}")))
}

/// Converts a coupon quoted in percent to a decimal rate.
pub fn coupon_rate(coupon_percent: Decimal) -> CliResult<Decimal> {
    if coupon_percent < Decimal::ZERO || coupon_percent > Decimal::ONE_HUNDRED {
        return Err(CliError::InvalidCoupon(decimal_to_f64(coupon_percent)));
    }
    Ok(coupon_percent / Decimal::ONE_HUNDRED)
}

/// Validates a clean price.
pub fn validate_price(price: Decimal) -> CliResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(CliError::InvalidPrice(decimal_to_f64(price)));
    }
    Ok(price)
}

fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_date_accepts_both_formats() {
        let iso = parse_date("2013-03-07").unwrap();
        let short = parse_date("07-Mar-13").unwrap();
        assert_eq!(iso, short);
        assert_eq!(parse_date(" 27-Sep-13 ").unwrap(), Date::from_ymd(2013, 9, 27).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("2013/03/07"), Err(CliError::InvalidDate(_))));
        assert!(matches!(parse_date("31-Feb-13"), Err(CliError::InvalidDate(_))));
    }

    #[test]
    fn test_conventions() {
        assert_eq!(parse_frequency("2").unwrap(), Frequency::SemiAnnual);
        assert_eq!(parse_frequency("annual").unwrap(), Frequency::Annual);
        assert_eq!(parse_day_count("ACT/ACT ICMA").unwrap(), DayCountConvention::ActActIcma);
        assert!(parse_day_count("ACT/999").is_err());
    }

    #[test]
    fn test_coupon_and_price() {
        let rate = coupon_rate(Decimal::from_str("4.25").unwrap()).unwrap();
        assert_eq!(rate, Decimal::from_str("0.0425").unwrap());
        assert!(coupon_rate(Decimal::from(-1)).is_err());
        assert!(validate_price(Decimal::ZERO).is_err());
    }
}
