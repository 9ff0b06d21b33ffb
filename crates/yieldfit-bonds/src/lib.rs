//! # Yieldfit Bonds
//!
//! Fixed coupon bonds and their yield to maturity.
//!
//! - **Instruments**: [`FixedBond`] with a validating builder
//! - **Cash Flows**: coupon dates generated backward from maturity, and
//!   accrued interest under the bond's day count
//! - **Pricing**: price/yield conversion with a bracketed Newton solver
//!
//! ## Example
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use yieldfit_bonds::prelude::*;
//! use yieldfit_core::prelude::*;
//!
//! let bond = FixedBond::builder()
//!     .coupon_rate(dec!(0.04))
//!     .maturity(Date::from_ymd(2020, 3, 7).unwrap())
//!     .frequency(Frequency::SemiAnnual)
//!     .day_count(DayCountConvention::ActActIcma)
//!     .build()
//!     .unwrap();
//!
//! let settlement = Date::from_ymd(2012, 9, 19).unwrap();
//! let ytm = bond.yield_to_maturity(settlement, dec!(120.0)).unwrap();
//! assert!(ytm.yield_value > 0.0 && ytm.yield_value < 0.04);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod cashflows;
pub mod error;
pub mod instruments;
pub mod pricing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{BondCashFlow, CashFlowKind};
    pub use crate::error::{BondError, BondResult};
    pub use crate::instruments::{FixedBond, FixedBondBuilder};
    pub use crate::pricing::{YieldResult, YieldSolver, YieldSolverConfig};
}

pub use error::{BondError, BondResult};
pub use instruments::FixedBond;
