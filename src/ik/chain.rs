use super::limits::RotationLimits;
use crate::error::{ChainDefect, SolverError};
use crate::math::Transform;
use glam::{Quat, Vec3};

/// Bones shorter than this are treated as zero length.
pub const MIN_BONE_LENGTH: f32 = 1e-6;

/// One joint of a chain, with the bind data the solver needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLink {
    /// Index of the joint in the skeleton it was taken from.
    pub joint: usize,
    /// Local translation from the parent joint (bind pose).
    pub offset: Vec3,
    pub rest_rotation: Quat,
    pub limits: RotationLimits,
}

impl ChainLink {
    pub fn new(joint: usize, offset: Vec3) -> Self {
        Self {
            joint,
            offset,
            rest_rotation: Quat::IDENTITY,
            limits: RotationLimits::default(),
        }
    }

    pub fn with_rest_rotation(mut self, rotation: Quat) -> Self {
        self.rest_rotation = rotation;
        self
    }

    pub fn with_limits(mut self, limits: RotationLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// A limb: 2 or 3 joints from the limb root to the end effector.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub(crate) name: String,
    pub(crate) frame: Transform,
    pub(crate) links: Vec<ChainLink>,
    pub(crate) bone_lengths: Vec<f32>,
    pub(crate) pole: Option<Vec3>,
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn joint_count(&self) -> usize {
        self.links.len()
    }

    /// Skeleton indices of the chain's joints, root first.
    pub fn joints(&self) -> impl Iterator<Item = usize> + '_ {
        self.links.iter().map(|l| l.joint)
    }

    pub fn bone_lengths(&self) -> &[f32] {
        &self.bone_lengths
    }

    pub fn total_length(&self) -> f32 {
        self.bone_lengths.iter().sum()
    }

    /// Skeleton-space transform of the root joint's parent.
    pub fn frame(&self) -> Transform {
        self.frame
    }

    /// Re-anchors the chain, e.g. after the torso above it has moved.
    pub fn set_frame(&mut self, frame: Transform) {
        self.frame = frame;
    }

    pub fn pole(&self) -> Option<Vec3> {
        self.pole
    }

    pub fn set_pole(&mut self, pole: Option<Vec3>) {
        self.pole = pole;
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        let count = self.links.len();
        if count < 2 {
            return Err(SolverError::DegenerateChain(ChainDefect::TooFewJoints(count)));
        }
        if count > 3 {
            return Err(SolverError::DegenerateChain(ChainDefect::TooManyJoints(count)));
        }

        if self.pole.is_some_and(|pole| !pole.is_finite()) {
            return Err(SolverError::DegenerateChain(ChainDefect::NonFinitePole));
        }

        match self
            .bone_lengths
            .iter()
            .position(|&length| !(length > MIN_BONE_LENGTH) || !length.is_finite())
        {
            Some(bone) => Err(SolverError::DegenerateChain(ChainDefect::ZeroLengthBone(bone))),
            None => Ok(()),
        }
    }

    /// Skeleton-space positions and world rotations of every joint, given each
    /// joint's rotation relative to rest.
    pub fn forward(&self, offsets: &[Quat]) -> (Vec<Vec3>, Vec<Quat>) {
        let mut positions = Vec::with_capacity(self.links.len());
        let mut rotations = Vec::with_capacity(self.links.len());
        let mut parent = self.frame;

        for (link, offset) in self.links.iter().zip(offsets) {
            let local = Transform::new(link.offset, link.rest_rotation * *offset);
            parent = parent.mul_transform(&local);
            positions.push(parent.position);
            rotations.push(parent.rotation);
        }

        (positions, rotations)
    }

    pub fn rest_positions(&self) -> Vec<Vec3> {
        self.forward(&vec![Quat::IDENTITY; self.links.len()]).0
    }
}

pub struct ChainBuilder {
    name: String,
    frame: Transform,
    links: Vec<ChainLink>,
    pole: Option<Vec3>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            name: String::from("chain"),
            frame: Transform::IDENTITY,
            links: Vec::new(),
            pole: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn frame(mut self, frame: Transform) -> Self {
        self.frame = frame;
        self
    }

    /// Adds a joint with identity rest rotation and free limits.
    pub fn add_joint(mut self, offset: Vec3) -> Self {
        let index = self.links.len();
        self.links.push(ChainLink::new(index, offset));
        self
    }

    pub fn add_joint_with_limits(mut self, offset: Vec3, limits: RotationLimits) -> Self {
        let index = self.links.len();
        self.links.push(ChainLink::new(index, offset).with_limits(limits));
        self
    }

    pub fn add_link(mut self, link: ChainLink) -> Self {
        self.links.push(link);
        self
    }

    /// Sets the limits of the `index`-th chain joint. Out of range indices are
    /// ignored.
    pub fn limits(mut self, index: usize, limits: RotationLimits) -> Self {
        if let Some(link) = self.links.get_mut(index) {
            link.limits = limits;
        }
        self
    }

    pub fn pole(mut self, pole: Vec3) -> Self {
        self.pole = Some(pole);
        self
    }

    pub fn build(self) -> Chain {
        let bone_lengths = self.calculate_bone_lengths();
        Chain {
            name: self.name,
            frame: self.frame,
            links: self.links,
            bone_lengths,
            pole: self.pole,
        }
    }

    fn calculate_bone_lengths(&self) -> Vec<f32> {
        self.links.iter().skip(1).map(|l| l.offset.length()).collect()
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}
