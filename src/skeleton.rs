use crate::error::ConfigError;
use crate::ik::{ChainBuilder, ChainLink, Joint, Pose};
use crate::math::Transform;

/// Joint hierarchy with bind pose and current rotations.
///
/// Parents always precede their children, so a single forward pass computes
/// every world transform.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self { joints: Vec::new() }
    }

    pub fn add_joint(&mut self, joint: Joint) -> Result<usize, ConfigError> {
        if self.find(&joint.name).is_some() {
            return Err(ConfigError::DuplicateJoint(joint.name));
        }
        if let Some(parent) = joint.parent {
            if parent >= self.joints.len() {
                return Err(ConfigError::UnknownParent {
                    joint: joint.name,
                    parent: parent.to_string(),
                });
            }
        }

        self.joints.push(joint);
        Ok(self.joints.len() - 1)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    pub fn joint(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Skeleton-space transform of every joint, using current rotations.
    pub fn world_transforms(&self) -> Vec<Transform> {
        let mut world: Vec<Transform> = Vec::with_capacity(self.joints.len());
        for joint in &self.joints {
            let local = joint.local_transform();
            let transform = match joint.parent {
                Some(parent) => world[parent].mul_transform(&local),
                None => local,
            };
            world.push(transform);
        }
        world
    }

    /// Skeleton-space transform of the parent of `index`; identity for roots.
    pub fn parent_frame(&self, index: usize) -> Transform {
        let mut frame = Transform::IDENTITY;
        let mut current = self.joints.get(index).and_then(|j| j.parent);
        while let Some(i) = current {
            let joint = &self.joints[i];
            frame = joint.local_transform().mul_transform(&frame);
            current = joint.parent;
        }
        frame
    }

    /// Starts a chain over `indices`, root first. Each joint must be a direct
    /// child of the one before it.
    pub fn chain(&self, name: &str, indices: &[usize]) -> Result<ChainBuilder, ConfigError> {
        let mut builder = ChainBuilder::new().name(name);

        for (position, &index) in indices.iter().enumerate() {
            let joint = self.joints.get(index).ok_or_else(|| ConfigError::UnknownJoint {
                chain: name.to_string(),
                joint: index.to_string(),
            })?;

            if position > 0 && joint.parent != Some(indices[position - 1]) {
                return Err(ConfigError::BrokenChain {
                    chain: name.to_string(),
                    joint: joint.name.clone(),
                });
            }

            builder = builder.add_link(
                ChainLink::new(index, joint.translation).with_rest_rotation(joint.rest_rotation),
            );
        }

        if let Some(&root) = indices.first() {
            builder = builder.frame(self.parent_frame(root));
        }
        Ok(builder)
    }

    /// Writes a solved pose into the current joint rotations.
    pub fn apply_pose(&mut self, pose: &Pose) {
        for rotation in &pose.rotations {
            if let Some(joint) = self.joints.get_mut(rotation.joint) {
                joint.rotation = rotation.local;
            }
        }
    }

    pub fn reset_pose(&mut self) {
        self.joints.iter_mut().for_each(Joint::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::solve;
    use glam::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;

    fn arm_skeleton() -> Skeleton {
        let mut skeleton = Skeleton::new();
        let torso = skeleton
            .add_joint(
                Joint::new("torso", Vec3::new(0.0, 1.0, 0.0))
                    .with_rest_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            )
            .unwrap();
        let shoulder = skeleton
            .add_joint(Joint::new("shoulder", Vec3::new(0.2, 0.4, 0.0)).with_parent(torso))
            .unwrap();
        let elbow = skeleton
            .add_joint(Joint::new("elbow", Vec3::new(0.3, 0.0, 0.0)).with_parent(shoulder))
            .unwrap();
        skeleton
            .add_joint(Joint::new("wrist", Vec3::new(0.3, 0.0, 0.0)).with_parent(elbow))
            .unwrap();
        skeleton
    }

    #[test]
    fn rejects_forward_parents_and_duplicates() {
        let mut skeleton = Skeleton::new();
        assert!(matches!(
            skeleton.add_joint(Joint::new("a", Vec3::ZERO).with_parent(0)),
            Err(ConfigError::UnknownParent { .. })
        ));

        skeleton.add_joint(Joint::new("a", Vec3::ZERO)).unwrap();
        assert!(matches!(
            skeleton.add_joint(Joint::new("a", Vec3::ZERO)),
            Err(ConfigError::DuplicateJoint(_))
        ));
    }

    #[test]
    fn parent_frame_matches_world_transforms() {
        let skeleton = arm_skeleton();
        let world = skeleton.world_transforms();
        let frame = skeleton.parent_frame(2);

        assert!(frame.position.distance(world[1].position) < 1e-6);
        assert!(frame.rotation.angle_between(world[1].rotation) < 1e-5);
        assert_eq!(skeleton.parent_frame(0), Transform::IDENTITY);
    }

    #[test]
    fn chain_must_follow_parent_links() {
        let skeleton = arm_skeleton();
        assert!(skeleton.chain("arm", &[1, 2, 3]).is_ok());
        assert!(matches!(
            skeleton.chain("arm", &[1, 3]),
            Err(ConfigError::BrokenChain { .. })
        ));
        assert!(matches!(
            skeleton.chain("arm", &[1, 9]),
            Err(ConfigError::UnknownJoint { .. })
        ));
    }

    #[test]
    fn applied_pose_moves_the_hand_onto_the_target() {
        let mut skeleton = arm_skeleton();
        let chain = skeleton.chain("arm", &[1, 2, 3]).unwrap().build();

        let rest_hand = skeleton.world_transforms()[3].position;
        assert!(chain.rest_positions()[2].distance(rest_hand) < 1e-5);

        let target = Vec3::new(0.2, 1.6, 0.2);
        let pose = solve(&chain, target).unwrap();
        skeleton.apply_pose(&pose);

        let hand = skeleton.world_transforms()[3].position;
        assert!(hand.distance(target) < 1e-4);
        assert!(hand.distance(pose.end_effector()) < 1e-4);

        skeleton.reset_pose();
        assert!(skeleton.world_transforms()[3].position.distance(rest_hand) < 1e-6);
    }
}
