//! Price and yield conversion.

mod yield_solver;

pub use yield_solver::{YieldResult, YieldSolver, YieldSolverConfig};
