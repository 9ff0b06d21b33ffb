//! # Yieldfit
//!
//! Bond yield solving and yield curve fitting.
//!
//! This crate re-exports the workspace libraries under one name:
//!
//! - [`core`]: dates, coupon frequencies and day count conventions
//! - [`math`]: root finders, least squares, Levenberg-Marquardt, B-splines
//! - [`bonds`]: fixed coupon bonds and yield to maturity
//! - [`curves`]: curve models and the fitted [`YieldCurve`](curves::YieldCurve)
//!
//! ## Example
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use yieldfit::prelude::*;
//!
//! let settlement = Date::from_ymd(2012, 9, 19).unwrap();
//! let quotes = [
//!     ("2014-03-07", dec!(0.0225), dec!(102.30)),
//!     ("2017-09-07", dec!(0.01), dec!(96.57)),
//!     ("2022-03-07", dec!(0.04), dec!(113.51)),
//!     ("2032-06-07", dec!(0.0425), dec!(118.48)),
//!     ("2060-01-22", dec!(0.04), dec!(115.88)),
//! ];
//!
//! let mut bonds = Vec::new();
//! let mut yields = Vec::new();
//! for (maturity, coupon, price) in quotes {
//!     let bond = FixedBond::builder()
//!         .coupon_rate(coupon)
//!         .maturity(Date::parse(maturity).unwrap())
//!         .build()
//!         .unwrap();
//!     yields.push(bond.yield_to_maturity(settlement, price).unwrap().yield_value);
//!     bonds.push(bond);
//! }
//!
//! let curve = YieldCurve::new(settlement, &bonds, &yields, CurveFitModel::nelson_siegel()).unwrap();
//! let ten_year = curve.interpolated_yield(Date::from_ymd(2022, 9, 19).unwrap()).unwrap();
//! assert!(ten_year > 0.01 && ten_year < 0.04);
//! ```

#![warn(missing_docs)]

pub use yieldfit_bonds as bonds;
pub use yieldfit_core as core;
pub use yieldfit_curves as curves;
pub use yieldfit_math as math;

/// Prelude with the types most programs need.
pub mod prelude {
    pub use yieldfit_bonds::prelude::*;
    pub use yieldfit_core::prelude::*;
    pub use yieldfit_curves::prelude::*;
}
