//! Dual optimization for binary sub-problems

pub mod smo;

pub use smo::{SmoSolution, SmoSolver};
