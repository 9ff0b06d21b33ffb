//! # Yieldfit Curves
//!
//! Yield curve fitting for the Yieldfit library.
//!
//! - **Models**: [`Polynomial`], [`NelsonSiegel`], [`NelsonSiegelSvensson`]
//!   and [`BSpline`], gathered in the [`CurveFitModel`] enum
//! - **Curve**: [`YieldCurve`] fits a model to bond yields at construction and
//!   answers yield queries by date
//! - **Configuration**: explicit fitter tolerances, time basis and
//!   extrapolation, plus the serialisable [`CurveFitSpec`]
//!
//! ## Quick Start
//!
//! ```rust
//! use yieldfit_core::Date;
//! use yieldfit_curves::prelude::*;
//!
//! let observations = vec![
//!     YieldObservation::new(2.0, 0.010),
//!     YieldObservation::new(5.0, 0.015),
//!     YieldObservation::new(10.0, 0.020),
//!     YieldObservation::new(30.0, 0.025),
//! ];
//!
//! let settlement = Date::from_ymd(2024, 1, 2).unwrap();
//! let curve = YieldCurve::from_observations(
//!     settlement,
//!     observations,
//!     CurveFitModel::nelson_siegel(),
//!     CurveConfig::default(),
//! )
//! .unwrap();
//!
//! assert!(curve.rms_error() < 1e-6);
//! let seven_year = curve.yield_at_time(7.0).unwrap();
//! assert!(seven_year > 0.015 && seven_year < 0.02);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::many_single_char_names)]

pub mod config;
pub mod curve;
pub mod error;
pub mod models;
pub mod observation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{
        CurveConfig, CurveFitSpec, Extrapolation, FitterConfig, NelsonSiegelConfig,
        SvenssonConfig,
    };
    pub use crate::curve::YieldCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::models::{
        BSpline, CurveFitModel, CurveModel, FittedParameters, NelsonSiegel,
        NelsonSiegelSvensson, Polynomial,
    };
    pub use crate::observation::YieldObservation;
}

pub use config::{CurveConfig, CurveFitSpec, Extrapolation, FitterConfig};
pub use curve::YieldCurve;
pub use error::{CurveError, CurveResult};
pub use models::{
    BSpline, CurveFitModel, CurveModel, FittedParameters, NelsonSiegel, NelsonSiegelSvensson,
    Polynomial,
};
pub use observation::YieldObservation;
