//! Target dynamics
//!
//! Spring smoothing applied to targets before they reach the solver.

mod smoothing;

pub use smoothing::{SpringParams, TargetSmoother};
