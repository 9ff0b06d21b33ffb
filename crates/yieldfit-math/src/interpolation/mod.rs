//! Spline bases for non-parametric curve fitting.

mod bspline;

pub use bspline::BSplineBasis;
