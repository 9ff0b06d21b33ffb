//! Cash flow generation and accrued interest.

mod accrued;
mod schedule;

pub use accrued::accrued_interest;
pub use schedule::CouponSchedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yieldfit_core::Date;

/// What a cash flow pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowKind {
    /// A regular coupon.
    Coupon,
    /// The final coupon together with redemption of face value.
    CouponAndPrincipal,
}

/// A dated bond cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondCashFlow {
    /// Payment date.
    pub date: Date,
    /// Amount paid per the bond's face value.
    pub amount: Decimal,
    /// Coupon or coupon plus redemption.
    pub kind: CashFlowKind,
}

impl BondCashFlow {
    /// Creates a coupon cash flow.
    #[must_use]
    pub fn coupon(date: Date, amount: Decimal) -> Self {
        Self {
            date,
            amount,
            kind: CashFlowKind::Coupon,
        }
    }

    /// Creates the final cash flow: last coupon plus redemption.
    #[must_use]
    pub fn final_payment(date: Date, coupon: Decimal, redemption: Decimal) -> Self {
        Self {
            date,
            amount: coupon + redemption,
            kind: CashFlowKind::CouponAndPrincipal,
        }
    }

    /// Returns true if this flow redeems principal.
    #[must_use]
    pub fn is_principal(&self) -> bool {
        self.kind == CashFlowKind::CouponAndPrincipal
    }
}
