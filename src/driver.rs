use crate::dynamics::{SpringParams, TargetSmoother};
use crate::ik::{solve, Chain, Pose};
use crate::skeleton::Skeleton;
use glam::Vec3;
use log::{info, warn};

/// Drives one limb from frame to frame.
///
/// A failed solve never disturbs the skeleton: the limb keeps its last valid
/// pose and the failure is logged once until a solve succeeds again.
#[derive(Debug, Clone)]
pub struct LimbDriver {
    chain: Chain,
    smoother: Option<TargetSmoother>,
    last_pose: Option<Pose>,
    failing: bool,
}

impl LimbDriver {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            smoother: None,
            last_pose: None,
            failing: false,
        }
    }

    /// Eases targets through a spring, starting from the chain's rest end
    /// effector.
    pub fn with_smoothing(mut self, params: SpringParams) -> Self {
        self.set_smoothing(params);
        self
    }

    /// Switches smoothing on, or retunes it, without dropping the current
    /// pose or spring state. A new spring starts at the last solved end
    /// effector.
    pub fn set_smoothing(&mut self, params: SpringParams) {
        match &mut self.smoother {
            Some(smoother) => smoother.set_params(params),
            None => {
                let start = match &self.last_pose {
                    Some(pose) => pose.end_effector(),
                    None => self.rest_end_effector(),
                };
                self.smoother = Some(TargetSmoother::new(params, start));
            }
        }
    }

    pub fn set_pole(&mut self, pole: Option<Vec3>) {
        self.chain.set_pole(pole);
    }

    /// Forgets the held pose and failure streak, and parks the spring on the
    /// rest end effector. Pair with [`Skeleton::reset_pose`].
    pub fn reset(&mut self) {
        let rest = self.rest_end_effector();
        if let Some(smoother) = &mut self.smoother {
            smoother.reset(rest);
        }
        self.last_pose = None;
        self.failing = false;
    }

    fn rest_end_effector(&self) -> Vec3 {
        self.chain.rest_positions().last().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn last_pose(&self) -> Option<&Pose> {
        self.last_pose.as_ref()
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }

    /// Solves for `target` and writes the pose into `skeleton`.
    ///
    /// The chain is re-anchored to the skeleton's current parent frame first,
    /// so the limb follows the body it hangs from.
    pub fn update(&mut self, skeleton: &mut Skeleton, target: Vec3, dt: f32) -> Option<&Pose> {
        let root = self.chain.joints().next();
        if let Some(root) = root {
            self.chain.set_frame(skeleton.parent_frame(root));
        }

        let goal = match &mut self.smoother {
            Some(smoother) if target.is_finite() => smoother.update(target, dt),
            _ => target,
        };

        match solve(&self.chain, goal) {
            Ok(pose) => {
                if self.failing {
                    info!("{}: solving again", self.chain.name());
                    self.failing = false;
                }
                skeleton.apply_pose(&pose);
                self.last_pose = Some(pose);
            }
            Err(err) => {
                if !self.failing {
                    warn!("{}: {}; holding last valid pose", self.chain.name(), err);
                    self.failing = true;
                }
            }
        }

        self.last_pose.as_ref()
    }
}
