//! Math utilities module
//!
//! Rigid transforms for the joint hierarchy and viewport rays for turning
//! screen input into targets.

mod ray;
mod transform;

pub use ray::Ray;
pub use transform::Transform;

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec3};
