//! # Yieldfit Math
//!
//! Numerical kernels behind bond yield solving and curve fitting:
//!
//! - **Solvers**: bracketed root finding, a Newton step guarded by bisection
//! - **Linear Algebra**: SVD least squares with an explicit rank check
//! - **Optimization**: bounded Levenberg-Marquardt for nonlinear least squares
//! - **Interpolation**: clamped B-spline bases
//!
//! Every routine takes its tolerances as an explicit configuration value.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::BSplineBasis;
    pub use crate::linear_algebra::least_squares;
    pub use crate::optimization::{
        levenberg_marquardt, Bounds, LevenbergMarquardtConfig, OptimizationResult, Termination,
    };
    pub use crate::solvers::{newton_bisection, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
