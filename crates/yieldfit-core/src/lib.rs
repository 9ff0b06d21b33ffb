//! # Yieldfit Core
//!
//! Foundational types shared by the Yieldfit crates:
//!
//! - **Types**: [`Date`] and coupon [`Frequency`]
//! - **Day Count Conventions**: accrual fractions under ACT/360, ACT/365F,
//!   ACT/ACT ISDA, ACT/ACT ICMA and the 30/360 family
//!
//! ## Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use yieldfit_core::prelude::*;
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! let yf = DayCountConvention::Thirty360US.year_fraction(start, end).unwrap();
//! assert_eq!(yf, Decimal::new(5, 1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::similar_names)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency};
}

pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency};
