use glam::{Quat, Vec3};

/// Rotation of one chain joint in a solved pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointRotation {
    /// Skeleton index of the joint.
    pub joint: usize,
    /// Rotation relative to the joint's rest rotation.
    pub offset: Quat,
    /// Full local rotation (`rest * offset`), ready to write into the skeleton.
    pub local: Quat,
}

/// Output of a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub rotations: Vec<JointRotation>,
    /// Skeleton-space joint positions after limits were applied.
    pub positions: Vec<Vec3>,
    /// Elbow bend in radians, 0 when the chain is straight.
    pub bend_angle: f32,
    /// Distance from the root to the target before clamping.
    pub target_distance: f32,
    /// Distance the chain was solved for, after clamping to its reach.
    pub solved_distance: f32,
    /// The end effector could be placed on the target.
    pub reachable: bool,
    /// At least one joint hit its rotation limits.
    pub constrained: bool,
}

impl Pose {
    pub fn end_effector(&self) -> Vec3 {
        self.positions.last().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn root(&self) -> Vec3 {
        self.positions.first().copied().unwrap_or(Vec3::ZERO)
    }
}
