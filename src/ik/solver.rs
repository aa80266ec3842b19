use super::chain::Chain;
use super::pose::{JointRotation, Pose};
use crate::error::SolverError;
use glam::{Mat3, Quat, Vec3};
use log::trace;
use std::f32::consts::PI;

/// Bend direction used when neither a pole nor the rest pose decides it.
pub const DEFAULT_BEND: Vec3 = Vec3::NEG_Z;

/// Fraction of the chain length a folded two-bone chain still keeps between
/// root and end effector.
const MIN_REACH_FRACTION: f32 = 1e-4;

/// Slack, relative to chain length, before a target counts as out of reach.
const REACH_TOLERANCE: f32 = 1e-4;

const DIRECTION_EPSILON: f32 = 1e-6;

/// Analytic limb aim solver.
///
/// Three-joint chains are solved as two bones with the law of cosines,
/// two-joint chains simply point their single bone at the target. Out of reach
/// targets are clamped rather than rejected.
pub struct AimSolver;

impl AimSolver {
    pub fn solve(chain: &Chain, target: Vec3) -> Result<Pose, SolverError> {
        if !target.is_finite() {
            return Err(SolverError::NonFiniteTarget(target));
        }
        chain.validate()?;

        let rest = chain.rest_positions();
        let root = rest[0];
        let to_target = target - root;
        let target_distance = to_target.length();

        let (min_reach, max_reach) = Self::reach(chain.bone_lengths());
        let solved_distance = target_distance.clamp(min_reach, max_reach);
        let slack = REACH_TOLERANCE * chain.total_length();
        let reachable =
            target_distance >= min_reach - slack && target_distance <= max_reach + slack;
        if !reachable {
            trace!(
                "{}: target {:.4} away, reach is [{:.4}, {:.4}]",
                chain.name,
                target_distance,
                min_reach,
                max_reach
            );
        }

        let direction = if target_distance > DIRECTION_EPSILON {
            to_target / target_distance
        } else {
            Self::rest_direction(&rest)
        };

        let bend = Self::bend_direction(chain, &rest, direction);
        let (desired, bend_angle) = match *chain.bone_lengths() {
            [upper, lower] => Self::two_bone(root, direction, bend, solved_distance, upper, lower),
            _ => (vec![root, root + direction * solved_distance], 0.0),
        };

        let rest_plane = Self::plane_normal(Self::rest_direction(&rest), Self::rest_bend(chain, &rest));
        let solved_plane = Self::plane_normal(direction, bend);
        let mut offsets = Self::rotations_for(chain, &rest, &desired, rest_plane, solved_plane);

        let mut constrained = false;
        for (offset, link) in offsets.iter_mut().zip(chain.links()) {
            let (clamped, hit) = link.limits.clamp(*offset);
            if hit {
                trace!("{}: joint {} limited", chain.name, link.joint);
                constrained = true;
            }
            *offset = clamped;
        }

        let (positions, _) = chain.forward(&offsets);
        let rotations = chain
            .links()
            .iter()
            .zip(&offsets)
            .map(|(link, &offset)| JointRotation {
                joint: link.joint,
                offset,
                local: (link.rest_rotation * offset).normalize(),
            })
            .collect();

        Ok(Pose {
            rotations,
            positions,
            bend_angle,
            target_distance,
            solved_distance,
            reachable,
            constrained,
        })
    }

    /// Closest and farthest distance the end effector can be from the root.
    pub fn reach(bone_lengths: &[f32]) -> (f32, f32) {
        match *bone_lengths {
            [upper, lower] => {
                let total = upper + lower;
                ((upper - lower).abs().max(total * MIN_REACH_FRACTION), total)
            }
            _ => {
                let total: f32 = bone_lengths.iter().sum();
                (total, total)
            }
        }
    }

    fn rest_direction(rest: &[Vec3]) -> Vec3 {
        let root = rest[0];
        rest.last()
            .and_then(|&tip| (tip - root).try_normalize())
            .or_else(|| (rest[1] - root).try_normalize())
            .unwrap_or(Vec3::Y)
    }

    fn two_bone(
        root: Vec3,
        direction: Vec3,
        bend: Vec3,
        distance: f32,
        upper: f32,
        lower: f32,
    ) -> (Vec<Vec3>, f32) {
        let cos_root = ((upper * upper + distance * distance - lower * lower)
            / (2.0 * upper * distance))
            .clamp(-1.0, 1.0);
        let cos_inner = ((upper * upper + lower * lower - distance * distance)
            / (2.0 * upper * lower))
            .clamp(-1.0, 1.0);
        let sin_root = (1.0 - cos_root * cos_root).max(0.0).sqrt();

        let elbow = root + (direction * cos_root + bend * sin_root) * upper;
        let tip = root + direction * distance;

        (vec![root, elbow, tip], PI - cos_inner.acos())
    }

    /// Unit vector perpendicular to `direction` that the elbow bends toward.
    ///
    /// Candidates in order: pole, rest-pose bend, `DEFAULT_BEND`, anything
    /// orthogonal. The first one not parallel to `direction` wins.
    fn bend_direction(chain: &Chain, rest: &[Vec3], direction: Vec3) -> Vec3 {
        let rest_bend = (rest[1] - rest[0]).reject_from_normalized(Self::rest_direction(rest));
        Self::first_perpendicular(chain.pole.into_iter().chain([rest_bend]), direction)
    }

    /// Bend direction of the rest pose itself. A bent rest chain keeps its own
    /// plane; a straight one takes the pole.
    fn rest_bend(chain: &Chain, rest: &[Vec3]) -> Vec3 {
        let axis = Self::rest_direction(rest);
        let rest_bend = (rest[1] - rest[0]).reject_from_normalized(axis);
        Self::first_perpendicular([rest_bend].into_iter().chain(chain.pole), axis)
    }

    fn first_perpendicular(candidates: impl Iterator<Item = Vec3>, axis: Vec3) -> Vec3 {
        candidates
            .chain([DEFAULT_BEND, axis.any_orthonormal_vector()])
            .map(|candidate| candidate.reject_from_normalized(axis))
            .find(|bend| bend.length_squared() > DIRECTION_EPSILON)
            .map(Vec3::normalize)
            .unwrap_or_else(|| axis.any_orthonormal_vector())
    }

    /// Normal of the plane the limb bends in.
    fn plane_normal(direction: Vec3, bend: Vec3) -> Vec3 {
        direction
            .cross(bend)
            .try_normalize()
            .unwrap_or_else(|| direction.any_orthonormal_vector())
    }

    /// Orthonormal frame of a bone lying in the bend plane.
    fn bone_frame(bone: Vec3, plane: Vec3) -> Mat3 {
        let along = bone.normalize();
        let side = plane
            .cross(along)
            .try_normalize()
            .unwrap_or_else(|| along.any_orthonormal_vector());
        Mat3::from_cols(along, side, along.cross(side))
    }

    /// Rotations relative to rest that carry each rest bone, together with
    /// the rest bend plane, onto the desired bone and the solved bend plane.
    ///
    /// Twist follows the bend plane, so it stays continuous wherever the bend
    /// direction is. The end effector keeps its rest rotation.
    fn rotations_for(
        chain: &Chain,
        rest: &[Vec3],
        desired: &[Vec3],
        rest_plane: Vec3,
        solved_plane: Vec3,
    ) -> Vec<Quat> {
        let links = chain.links();
        let mut offsets = vec![Quat::IDENTITY; links.len()];
        let (_, rest_world) = chain.forward(&offsets);
        let mut parent = chain.frame().rotation;

        for (i, link) in links.iter().enumerate().take(links.len() - 1) {
            let from = Self::bone_frame(rest[i + 1] - rest[i], rest_plane);
            let to = Self::bone_frame(desired[i + 1] - desired[i], solved_plane);
            let swing = Quat::from_mat3(&(to * from.transpose()));

            let world = (swing * rest_world[i]).normalize();
            offsets[i] = (link.rest_rotation.inverse() * parent.inverse() * world).normalize();
            parent = world;
        }

        offsets
    }
}

/// Solves `chain` for `target`. See [`AimSolver`].
pub fn solve(chain: &Chain, target: Vec3) -> Result<Pose, SolverError> {
    AimSolver::solve(chain, target)
}
