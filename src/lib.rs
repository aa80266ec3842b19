//! # limb-aim
//!
//! Analytic inverse kinematics for pointing a character's limb at a point in
//! space, meant to run once per frame inside a render loop.
//!
//! ## Features
//! - Closed-form two-bone solve (shoulder, elbow, wrist) and single-bone aiming
//! - Pole vectors and rest-pose bend direction to pick the elbow side
//! - Per-axis joint limits; limited poses are flagged, never rejected
//! - JSON rig descriptions, target smoothing, WASM bindings
//!
//! ## Example
//! ```rust
//! use limb_aim::ik::{solve, Chain};
//! use glam::Vec3;
//!
//! let chain = Chain::builder()
//!     .add_joint(Vec3::ZERO)
//!     .add_joint(Vec3::new(0.0, 1.0, 0.0))
//!     .add_joint(Vec3::new(0.0, 1.0, 0.0))
//!     .pole(Vec3::Z)
//!     .build();
//!
//! let pose = solve(&chain, Vec3::new(1.0, 1.0, 0.0)).unwrap();
//! assert!(pose.reachable);
//! assert!(pose.end_effector().distance(Vec3::new(1.0, 1.0, 0.0)) < 1e-4);
//! ```

pub mod config;
pub mod driver;
pub mod dynamics;
pub mod error;
pub mod ik;
pub mod math;
pub mod skeleton;
pub mod sweep;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Rig, RigConfig};
pub use driver::LimbDriver;
pub use dynamics::{SpringParams, TargetSmoother};
pub use error::{ChainDefect, ConfigError, SolverError};
pub use ik::{solve, AimSolver, Chain, ChainBuilder, ChainLink, Joint, Pose, RotationLimits};
pub use math::Transform;
pub use skeleton::Skeleton;
pub use sweep::TargetSweep;
