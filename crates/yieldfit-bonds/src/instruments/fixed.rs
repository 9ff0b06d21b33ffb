//! Fixed coupon bond.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yieldfit_core::daycounts::{DayCountConvention, ReferencePeriod};
use yieldfit_core::types::{Date, Frequency};

use crate::cashflows::{accrued_interest, BondCashFlow, CouponSchedule};
use crate::error::{BondError, BondResult};
use crate::pricing::{YieldResult, YieldSolver};

/// A fixed coupon bullet bond.
///
/// Immutable once built. Redemption is at face value (100 by default) and
/// coupons are `face × coupon_rate / frequency`. Deserialization runs the
/// same checks as [`FixedBondBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FixedBondData")]
pub struct FixedBond {
    /// Optional identifier (ISIN, ticker, or a free-form label).
    identifier: Option<String>,

    /// Coupon rate as decimal (0.05 = 5%).
    coupon_rate: Decimal,

    /// Maturity date.
    maturity: Date,

    /// Payment frequency.
    frequency: Frequency,

    /// Face value (default 100).
    face_value: Decimal,

    /// Accrual convention for accrued interest and partial-period discounting.
    day_count: DayCountConvention,
}

/// Serialized form of [`FixedBond`], validated on the way in.
#[derive(Deserialize)]
struct FixedBondData {
    identifier: Option<String>,
    coupon_rate: Decimal,
    maturity: Date,
    frequency: Frequency,
    face_value: Decimal,
    day_count: DayCountConvention,
}

impl TryFrom<FixedBondData> for FixedBond {
    type Error = BondError;

    fn try_from(data: FixedBondData) -> BondResult<Self> {
        let builder = FixedBondBuilder::new()
            .coupon_rate(data.coupon_rate)
            .maturity(data.maturity)
            .frequency(data.frequency)
            .face_value(data.face_value)
            .day_count(data.day_count);
        match data.identifier {
            Some(id) => builder.identifier(id).build(),
            None => builder.build(),
        }
    }
}

impl FixedBond {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> FixedBondBuilder {
        FixedBondBuilder::new()
    }

    /// Returns the identifier, if one was given.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the coupon rate as a decimal.
    #[must_use]
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Returns the maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Returns the coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the face (redemption) value.
    #[must_use]
    pub fn face_value(&self) -> Decimal {
        self.face_value
    }

    /// Returns the day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the annual coupon amount per face value.
    #[must_use]
    pub fn annual_coupon(&self) -> Decimal {
        self.coupon_rate * self.face_value
    }

    /// Returns the coupon amount per period.
    #[must_use]
    pub fn coupon_per_period(&self) -> Decimal {
        self.annual_coupon() / Decimal::from(self.frequency.periods_per_year())
    }

    /// Coupon schedule as seen from `settlement`.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidSettlement` if `settlement >= maturity`.
    pub fn schedule(&self, settlement: Date) -> BondResult<CouponSchedule> {
        self.check_settlement(settlement)?;
        Ok(CouponSchedule::generate(
            self.maturity,
            self.frequency,
            settlement,
        )?)
    }

    /// All cash flows strictly after `settlement`, ascending by date.
    ///
    /// Every coupon pays `coupon_per_period`; the flow on maturity also
    /// repays face value.
    ///
    /// # Errors
    ///
    /// Returns `BondError::InvalidSettlement` if `settlement >= maturity`.
    pub fn cash_flow_schedule(&self, settlement: Date) -> BondResult<Vec<BondCashFlow>> {
        let schedule = self.schedule(settlement)?;
        let coupon = self.coupon_per_period();

        Ok(schedule
            .remaining()
            .iter()
            .map(|&date| {
                if date == self.maturity {
                    BondCashFlow::final_payment(date, coupon, self.face_value)
                } else {
                    BondCashFlow::coupon(date, coupon)
                }
            })
            .collect())
    }

    /// Last coupon date on or before `settlement`.
    pub fn previous_coupon_date(&self, settlement: Date) -> BondResult<Date> {
        Ok(self.schedule(settlement)?.previous_coupon())
    }

    /// First coupon date strictly after `settlement`.
    pub fn next_coupon_date(&self, settlement: Date) -> BondResult<Date> {
        let schedule = self.schedule(settlement)?;
        schedule
            .next_coupon()
            .ok_or_else(|| BondError::invalid_spec("no coupon after settlement"))
    }

    /// Coupon period containing `settlement`.
    pub fn current_period(&self, settlement: Date) -> BondResult<ReferencePeriod> {
        let schedule = self.schedule(settlement)?;
        schedule
            .current_period()
            .ok_or_else(|| BondError::invalid_spec("no coupon after settlement"))
    }

    /// Interest accrued from the previous coupon date to `settlement`.
    pub fn accrued_interest(&self, settlement: Date) -> BondResult<Decimal> {
        let period = self.current_period(settlement)?;
        Ok(accrued_interest(
            settlement,
            &period,
            self.coupon_rate,
            self.face_value,
            self.day_count,
        )?)
    }

    /// Annual coupon divided by clean price.
    pub fn current_yield(&self, clean_price: Decimal) -> BondResult<Decimal> {
        if clean_price <= Decimal::ZERO {
            return Err(BondError::invalid_price(format!(
                "clean price must be positive, got {clean_price}"
            )));
        }
        Ok(self.annual_coupon() / clean_price)
    }

    /// Yield to maturity from a clean price, using the default solver.
    pub fn yield_to_maturity(&self, settlement: Date, clean_price: Decimal) -> BondResult<YieldResult> {
        YieldSolver::default().yield_to_maturity(self, settlement, clean_price)
    }

    /// Clean price from a yield, using the default solver conventions.
    pub fn clean_price_from_yield(&self, settlement: Date, yield_value: f64) -> BondResult<f64> {
        YieldSolver::default().clean_price_from_yield(self, settlement, yield_value)
    }

    /// Full (dirty) price from a yield.
    pub fn full_price_from_yield(&self, settlement: Date, yield_value: f64) -> BondResult<f64> {
        YieldSolver::default().dirty_price_from_yield(self, settlement, yield_value)
    }

    /// Modified duration at `yield_value`.
    pub fn modified_duration(&self, settlement: Date, yield_value: f64) -> BondResult<f64> {
        YieldSolver::default().modified_duration(self, settlement, yield_value)
    }

    fn check_settlement(&self, settlement: Date) -> BondResult<()> {
        if settlement >= self.maturity {
            return Err(BondError::InvalidSettlement {
                settlement,
                maturity: self.maturity,
            });
        }
        Ok(())
    }
}

/// Builder for fixed coupon bonds.
#[derive(Debug, Clone)]
pub struct FixedBondBuilder {
    identifier: Option<String>,
    coupon_rate: Option<Decimal>,
    maturity: Option<Date>,
    frequency: Frequency,
    face_value: Decimal,
    day_count: DayCountConvention,
}

impl Default for FixedBondBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedBondBuilder {
    /// Creates a new builder: semi-annual, ACT/ACT ICMA, face 100.
    #[must_use]
    pub fn new() -> Self {
        Self {
            identifier: None,
            coupon_rate: None,
            maturity: None,
            frequency: Frequency::SemiAnnual,
            face_value: Decimal::ONE_HUNDRED,
            day_count: DayCountConvention::ActActIcma,
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the coupon rate (as decimal, 0.05 = 5%).
    #[must_use]
    pub fn coupon_rate(mut self, rate: Decimal) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity = Some(date);
        self
    }

    /// Sets the payment frequency.
    #[must_use]
    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = freq;
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn face_value(mut self, value: Decimal) -> Self {
        self.face_value = value;
        self
    }

    /// Sets the day count convention.
    #[must_use]
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Builds the fixed bond.
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon rate or maturity is missing, the
    /// coupon rate is negative, or the face value is not positive.
    pub fn build(self) -> BondResult<FixedBond> {
        let coupon_rate = self
            .coupon_rate
            .ok_or_else(|| BondError::missing_field("coupon_rate"))?;
        let maturity = self
            .maturity
            .ok_or_else(|| BondError::missing_field("maturity"))?;

        if coupon_rate < Decimal::ZERO {
            return Err(BondError::invalid_spec("Coupon rate cannot be negative"));
        }
        if self.face_value <= Decimal::ZERO {
            return Err(BondError::invalid_spec("Face value must be positive"));
        }

        Ok(FixedBond {
            identifier: self.identifier,
            coupon_rate,
            maturity,
            frequency: self.frequency,
            face_value: self.face_value,
            day_count: self.day_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflows::CashFlowKind;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn gilt() -> FixedBond {
        FixedBond::builder()
            .identifier("UKT 4.5 03/07/13")
            .coupon_rate(dec!(0.045))
            .maturity(date(2013, 3, 7))
            .build()
            .unwrap()
    }

    #[test]
    fn test_fixed_bond_builder() {
        let bond = gilt();

        assert_eq!(bond.identifier(), Some("UKT 4.5 03/07/13"));
        assert_eq!(bond.coupon_rate(), dec!(0.045));
        assert_eq!(bond.annual_coupon(), dec!(4.5));
        assert_eq!(bond.coupon_per_period(), dec!(2.25));
        assert_eq!(bond.frequency(), Frequency::SemiAnnual);
        assert_eq!(bond.day_count(), DayCountConvention::ActActIcma);
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            FixedBond::builder().build(),
            Err(BondError::missing_field("coupon_rate"))
        );
        assert_eq!(
            FixedBond::builder().coupon_rate(dec!(0.05)).build(),
            Err(BondError::missing_field("maturity"))
        );
    }

    #[test]
    fn test_negative_coupon_error() {
        let result = FixedBond::builder()
            .coupon_rate(dec!(-0.01))
            .maturity(date(2030, 1, 1))
            .build();
        assert!(matches!(result, Err(BondError::InvalidSpec { .. })));
    }

    #[test]
    fn test_cash_flow_schedule() {
        let bond = FixedBond::builder()
            .coupon_rate(dec!(0.045))
            .maturity(date(2014, 3, 7))
            .build()
            .unwrap();
        let flows = bond.cash_flow_schedule(date(2012, 9, 19)).unwrap();

        let dates: Vec<Date> = flows.iter().map(|cf| cf.date).collect();
        assert_eq!(dates, vec![date(2013, 3, 7), date(2013, 9, 7), date(2014, 3, 7)]);
        assert!(flows[..2]
            .iter()
            .all(|cf| cf.amount == dec!(2.25) && cf.kind == CashFlowKind::Coupon));
        assert_eq!(flows[2].amount, dec!(102.25));
        assert!(flows[2].is_principal());
    }

    #[test]
    fn test_single_remaining_coupon() {
        let flows = gilt().cash_flow_schedule(date(2012, 9, 19)).unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].date, date(2013, 3, 7));
        assert_eq!(flows[0].amount, dec!(102.25));
    }

    #[test]
    fn test_zero_coupon_schedule_pays_only_face() {
        let bond = FixedBond::builder()
            .coupon_rate(Decimal::ZERO)
            .maturity(date(2014, 6, 1))
            .frequency(Frequency::Annual)
            .build()
            .unwrap();
        let flows = bond.cash_flow_schedule(date(2012, 9, 19)).unwrap();

        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].amount, Decimal::ZERO);
        assert_eq!(flows[1].amount, dec!(100));
    }

    #[test]
    fn test_settlement_on_or_after_maturity() {
        let bond = gilt();
        for settlement in [date(2013, 3, 7), date(2014, 1, 1)] {
            assert!(matches!(
                bond.cash_flow_schedule(settlement),
                Err(BondError::InvalidSettlement { .. })
            ));
        }
    }

    #[test]
    fn test_coupon_dates_and_accrued() {
        let bond = gilt();
        let settle = date(2012, 9, 19);

        assert_eq!(bond.previous_coupon_date(settle).unwrap(), date(2012, 9, 7));
        assert_eq!(bond.next_coupon_date(settle).unwrap(), date(2013, 3, 7));

        // 12 of 181 days in the period
        let accrued = bond.accrued_interest(settle).unwrap();
        assert_eq!(accrued, dec!(100) * dec!(0.045) * (dec!(12) / dec!(362)));
    }

    #[test]
    fn test_current_yield() {
        let bond = gilt();
        assert_eq!(bond.current_yield(dec!(90)).unwrap(), dec!(0.05));
        assert!(matches!(
            bond.current_yield(Decimal::ZERO),
            Err(BondError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_full_price_is_clean_plus_accrued() {
        let bond = gilt();
        let settle = date(2012, 9, 19);
        let full = bond.full_price_from_yield(settle, 0.01).unwrap();
        let clean = bond.clean_price_from_yield(settle, 0.01).unwrap();
        let accrued = bond.accrued_interest(settle).unwrap();

        assert!((full - clean - accrued.to_f64().unwrap()).abs() < 1e-12);
        assert!(bond.modified_duration(settle, 0.01).unwrap() > 0.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let bond = gilt();
        let json = serde_json::to_string(&bond).unwrap();
        let back: FixedBond = serde_json::from_str(&json).unwrap();
        assert_eq!(back.maturity(), bond.maturity());
        assert_eq!(back.day_count(), DayCountConvention::ActActIcma);
        assert_eq!(back.identifier(), bond.identifier());
    }

    #[test]
    fn test_deserialize_validates_like_the_builder() {
        let mut value = serde_json::to_value(gilt()).unwrap();
        value["coupon_rate"] = serde_json::json!(-0.01);
        let err = serde_json::from_value::<FixedBond>(value).unwrap_err();
        assert!(err.to_string().contains("Coupon rate cannot be negative"));

        let mut value = serde_json::to_value(gilt()).unwrap();
        value["face_value"] = serde_json::json!(0.0);
        assert!(serde_json::from_value::<FixedBond>(value).is_err());
    }
}
