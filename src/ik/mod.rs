//! Inverse Kinematics module
//!
//! Joint and chain types, rotation limits and the analytic aim solver.

pub mod chain;
pub mod joint;
pub mod limits;
pub mod pose;
pub mod solver;

pub use chain::{Chain, ChainBuilder, ChainLink};
pub use joint::Joint;
pub use limits::{AngleRange, Axis, RotationLimits};
pub use pose::{JointRotation, Pose};
pub use solver::{solve, AimSolver};
