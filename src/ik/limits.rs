use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// Slack allowed when checking an angle against its range.
const ANGLE_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    pub const FULL: Self = Self { min: -PI, max: PI };
    pub const HALF: Self = Self {
        min: -FRAC_PI_2,
        max: FRAC_PI_2,
    };

    /// Builds a range from radians, swapping the bounds if given reversed.
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_degrees(min: f32, max: f32) -> Self {
        Self::new(min.to_radians(), max.to_radians())
    }

    pub fn clamp(&self, angle: f32) -> f32 {
        angle.clamp(self.min, self.max)
    }

    pub fn contains(&self, angle: f32, tolerance: f32) -> bool {
        angle >= self.min - tolerance && angle <= self.max + tolerance
    }
}

/// A joint-local axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    fn order(self) -> EulerRot {
        match self {
            Axis::X => EulerRot::YXZ,
            Axis::Y => EulerRot::XYZ,
            Axis::Z => EulerRot::XZY,
        }
    }

    /// Decomposes `rotation` into per-axis angles, returned as (x, y, z).
    fn decompose(self, rotation: Quat) -> Vec3 {
        let (a, b, c) = rotation.to_euler(self.order());
        match self {
            Axis::X => Vec3::new(b, a, c),
            Axis::Y => Vec3::new(a, b, c),
            Axis::Z => Vec3::new(a, c, b),
        }
    }

    fn compose(self, angles: Vec3) -> Quat {
        let (a, b, c) = match self {
            Axis::X => (angles.y, angles.x, angles.z),
            Axis::Y => (angles.x, angles.y, angles.z),
            Axis::Z => (angles.x, angles.z, angles.y),
        };
        Quat::from_euler(self.order(), a, b, c)
    }
}

/// Per-axis rotation limits for a joint, relative to its rest rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationLimits {
    pub x: AngleRange,
    pub y: AngleRange,
    pub z: AngleRange,
    /// Axis placed in the middle of the Euler decomposition. That angle is
    /// confined to +/-90 degrees, so this should be the axis the bone twists
    /// around (usually the one it points along).
    #[serde(default)]
    pub twist: Axis,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self::free(Axis::default())
    }
}

impl RotationLimits {
    /// Limits that never clamp anything.
    pub fn free(twist: Axis) -> Self {
        let mut limits = Self {
            x: AngleRange::FULL,
            y: AngleRange::FULL,
            z: AngleRange::FULL,
            twist,
        };
        *limits.axis_mut(twist) = AngleRange::HALF;
        limits
    }

    pub fn new(x: AngleRange, y: AngleRange, z: AngleRange, twist: Axis) -> Self {
        Self { x, y, z, twist }
    }

    pub fn with_axis(mut self, axis: Axis, range: AngleRange) -> Self {
        *self.axis_mut(axis) = range;
        self
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AngleRange {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Clamps `offset` into the limits. The flag is set when clamping changed
    /// the rotation; otherwise `offset` is returned untouched.
    pub fn clamp(&self, offset: Quat) -> (Quat, bool) {
        let angles = self.twist.decompose(offset);
        let clamped = Vec3::new(
            self.x.clamp(angles.x),
            self.y.clamp(angles.y),
            self.z.clamp(angles.z),
        );

        if clamped == angles {
            (offset, false)
        } else {
            (self.twist.compose(clamped), true)
        }
    }

    pub fn contains(&self, offset: Quat) -> bool {
        let angles = self.twist.decompose(offset);
        self.x.contains(angles.x, ANGLE_TOLERANCE)
            && self.y.contains(angles.y, ANGLE_TOLERANCE)
            && self.z.contains(angles.z, ANGLE_TOLERANCE)
    }
}
