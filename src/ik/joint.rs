use crate::math::Transform;
use glam::{Quat, Vec3};

/// A node of the skeleton hierarchy.
///
/// `translation` and `rest_rotation` come from the bind pose and never change;
/// `rotation` is the current local rotation written back from solved poses.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rest_rotation: Quat,
    pub rotation: Quat,
}

impl Joint {
    pub fn new(name: impl Into<String>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            parent: None,
            translation,
            rest_rotation: Quat::IDENTITY,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_rest_rotation(mut self, rotation: Quat) -> Self {
        self.rest_rotation = rotation;
        self.rotation = rotation;
        self
    }

    pub fn local_transform(&self) -> Transform {
        Transform::new(self.translation, self.rotation)
    }

    /// Current rotation relative to the rest rotation.
    pub fn offset_from_rest(&self) -> Quat {
        (self.rest_rotation.inverse() * self.rotation).normalize()
    }

    pub fn reset(&mut self) {
        self.rotation = self.rest_rotation;
    }
}
