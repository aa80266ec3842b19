//! Rig description loaded from JSON.
//!
//! ```json
//! {
//!   "joints": [
//!     { "name": "Shoulder", "translation": [0.0, 1.4, 0.0] },
//!     { "name": "Elbow", "parent": "Shoulder", "translation": [0.3, 0.0, 0.0] },
//!     { "name": "Wrist", "parent": "Elbow", "translation": [0.3, 0.0, 0.0] }
//!   ],
//!   "chains": [
//!     {
//!       "name": "arm",
//!       "joints": ["Shoulder", "Elbow", "Wrist"],
//!       "pole": [0.0, 0.0, -1.0],
//!       "limits": [{ "joint": "Elbow", "twist": "x", "y": [-150.0, 10.0] }]
//!     }
//!   ]
//! }
//! ```
//!
//! Angles are in degrees, quaternions are `[x, y, z, w]`.

use crate::error::ConfigError;
use crate::ik::{AngleRange, Axis, Chain, Joint, RotationLimits};
use crate::skeleton::Skeleton;
use glam::{Quat, Vec3, Vec4};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigConfig {
    pub joints: Vec<JointConfig>,
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub translation: Vec3,
    #[serde(default)]
    pub rotation: Quat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    pub name: String,
    /// Joint names from limb root to end effector.
    pub joints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pole: Option<Vec3>,
    #[serde(default)]
    pub limits: Vec<LimitsConfig>,
}

/// Rotation limits of one chain joint, in degrees. Axes left out are free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    pub joint: String,
    #[serde(default)]
    pub twist: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<[f32; 2]>,
}

impl LimitsConfig {
    pub fn to_limits(&self) -> RotationLimits {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
            .into_iter()
            .fold(RotationLimits::free(self.twist), |limits, (axis, range)| match range {
                Some([min, max]) => limits.with_axis(axis, AngleRange::from_degrees(min, max)),
                None => limits,
            })
    }
}

/// A built rig: the skeleton and its named chains.
#[derive(Debug, Clone)]
pub struct Rig {
    pub skeleton: Skeleton,
    pub chains: Vec<Chain>,
}

impl Rig {
    pub fn chain(&self, name: &str) -> Result<&Chain, ConfigError> {
        self.chains
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ConfigError::UnknownChain(name.to_string()))
    }
}

impl RigConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build(&self) -> Result<Rig, ConfigError> {
        let skeleton = self.build_skeleton()?;
        let chains = self
            .chains
            .iter()
            .map(|config| Self::build_chain(&skeleton, config))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "rig built: {} joints, {} chains",
            skeleton.len(),
            chains.len()
        );
        Ok(Rig { skeleton, chains })
    }

    fn build_skeleton(&self) -> Result<Skeleton, ConfigError> {
        let mut skeleton = Skeleton::new();

        for config in &self.joints {
            if !config.translation.is_finite() {
                return Err(ConfigError::NonFiniteTranslation(config.name.clone()));
            }
            let rotation = Vec4::from(config.rotation)
                .try_normalize()
                .map(Quat::from_vec4)
                .ok_or_else(|| ConfigError::InvalidRotation(config.name.clone()))?;

            let mut joint =
                Joint::new(config.name.clone(), config.translation).with_rest_rotation(rotation);

            if let Some(parent) = &config.parent {
                let index = skeleton.find(parent).ok_or_else(|| ConfigError::UnknownParent {
                    joint: config.name.clone(),
                    parent: parent.clone(),
                })?;
                joint = joint.with_parent(index);
            }

            skeleton.add_joint(joint)?;
        }

        Ok(skeleton)
    }

    fn build_chain(skeleton: &Skeleton, config: &ChainConfig) -> Result<Chain, ConfigError> {
        let unknown = |joint: &str| ConfigError::UnknownJoint {
            chain: config.name.clone(),
            joint: joint.to_string(),
        };

        let indices = config
            .joints
            .iter()
            .map(|name| skeleton.find(name).ok_or_else(|| unknown(name)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = skeleton.chain(&config.name, &indices)?;
        for limits in &config.limits {
            let position = config
                .joints
                .iter()
                .position(|name| *name == limits.joint)
                .ok_or_else(|| unknown(&limits.joint))?;
            builder = builder.limits(position, limits.to_limits());
        }
        if let Some(pole) = config.pole {
            builder = builder.pole(pole);
        }

        let chain = builder.build();
        chain.validate().map_err(|source| ConfigError::InvalidChain {
            chain: config.name.clone(),
            source,
        })?;
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainDefect, SolverError};
    use approx::assert_abs_diff_eq;

    const ARM: &str = r#"{
        "joints": [
            { "name": "Spine", "translation": [0.0, 1.2, 0.0] },
            { "name": "Shoulder", "parent": "Spine", "translation": [0.2, 0.2, 0.0] },
            { "name": "Elbow", "parent": "Shoulder", "translation": [0.3, 0.0, 0.0] },
            { "name": "Wrist", "parent": "Elbow", "translation": [0.25, 0.0, 0.0] }
        ],
        "chains": [
            {
                "name": "arm",
                "joints": ["Shoulder", "Elbow", "Wrist"],
                "pole": [0.0, 0.0, -1.0],
                "limits": [{ "joint": "Elbow", "twist": "x", "y": [-150.0, 10.0] }]
            }
        ]
    }"#;

    #[test]
    fn builds_skeleton_and_chain() {
        let rig = RigConfig::from_json(ARM).unwrap().build().unwrap();

        assert_eq!(rig.skeleton.len(), 4);
        let chain = rig.chain("arm").unwrap();
        assert_eq!(chain.joints().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_abs_diff_eq!(chain.bone_lengths()[0], 0.3, epsilon = 1e-6);
        assert_abs_diff_eq!(chain.bone_lengths()[1], 0.25, epsilon = 1e-6);
        assert_eq!(chain.pole(), Some(Vec3::NEG_Z));
        assert_eq!(chain.frame().position, Vec3::new(0.0, 1.2, 0.0));

        let elbow = &chain.links()[1].limits;
        assert_eq!(elbow.twist, Axis::X);
        assert_eq!(elbow.y, AngleRange::from_degrees(-150.0, 10.0));
        assert_eq!(elbow.x, AngleRange::HALF);
        assert_eq!(elbow.z, AngleRange::FULL);
    }

    #[test]
    fn unknown_chain_is_an_error() {
        let rig = RigConfig::from_json(ARM).unwrap().build().unwrap();
        assert!(matches!(rig.chain("leg"), Err(ConfigError::UnknownChain(_))));
    }

    #[test]
    fn unknown_parent_and_fields_are_rejected() {
        let orphan = r#"{ "joints": [{ "name": "A", "parent": "B", "translation": [0, 0, 0] }] }"#;
        assert!(matches!(
            RigConfig::from_json(orphan).unwrap().build(),
            Err(ConfigError::UnknownParent { .. })
        ));

        let typo = r#"{ "joints": [{ "name": "A", "translaton": [0, 0, 0] }] }"#;
        assert!(matches!(RigConfig::from_json(typo), Err(ConfigError::Json(_))));
    }

    #[test]
    fn degenerate_chain_is_reported_with_its_name() {
        let json = r#"{
            "joints": [
                { "name": "A", "translation": [0, 0, 0] },
                { "name": "B", "parent": "A", "translation": [0, 0, 0] },
                { "name": "C", "parent": "B", "translation": [0, 1, 0] }
            ],
            "chains": [{ "name": "limb", "joints": ["A", "B", "C"] }]
        }"#;

        match RigConfig::from_json(json).unwrap().build() {
            Err(ConfigError::InvalidChain { chain, source }) => {
                assert_eq!(chain, "limb");
                assert_eq!(
                    source,
                    SolverError::DegenerateChain(ChainDefect::ZeroLengthBone(0))
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bad_joint_transforms_are_rejected() {
        let zero_rotation = r#"{
            "joints": [{ "name": "A", "translation": [0, 0, 0], "rotation": [0, 0, 0, 0] }]
        }"#;
        assert!(matches!(
            RigConfig::from_json(zero_rotation).unwrap().build(),
            Err(ConfigError::InvalidRotation(name)) if name == "A"
        ));

        let mut config = RigConfig::from_json(ARM).unwrap();
        config.joints[2].rotation = Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0);
        assert!(matches!(config.build(), Err(ConfigError::InvalidRotation(name)) if name == "Elbow"));

        let mut config = RigConfig::from_json(ARM).unwrap();
        config.joints[3].translation = Vec3::new(f32::INFINITY, 0.0, 0.0);
        assert!(matches!(
            config.build(),
            Err(ConfigError::NonFiniteTranslation(name)) if name == "Wrist"
        ));
    }

    #[test]
    fn non_finite_pole_is_rejected() {
        let mut config = RigConfig::from_json(ARM).unwrap();
        config.chains[0].pole = Some(Vec3::new(0.0, f32::NAN, -1.0));

        match config.build() {
            Err(ConfigError::InvalidChain { chain, source }) => {
                assert_eq!(chain, "arm");
                assert_eq!(source, SolverError::DegenerateChain(ChainDefect::NonFinitePole));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn limits_for_joints_outside_the_chain_are_rejected() {
        let mut config = RigConfig::from_json(ARM).unwrap();
        config.chains[0].limits[0].joint = String::from("Spine");
        assert!(matches!(config.build(), Err(ConfigError::UnknownJoint { .. })));
    }

    #[test]
    fn survives_a_json_round_trip() {
        let config = RigConfig::from_json(ARM).unwrap();
        let again = RigConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, again);
    }
}
