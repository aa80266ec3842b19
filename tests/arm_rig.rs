use approx::assert_abs_diff_eq;
use glam::Vec3;
use limb_aim::{solve, Chain, LimbDriver, Pose, Rig, RigConfig, TargetSweep};

const RIG: &str = include_str!("../assets/xbot_arms.json");

fn rig() -> Rig {
    RigConfig::from_json(RIG).unwrap().build().unwrap()
}

fn assert_within_limits(chain: &Chain, pose: &Pose) {
    for (rotation, link) in pose.rotations.iter().zip(chain.links()) {
        assert_eq!(rotation.joint, link.joint);
        assert!(
            link.limits.contains(rotation.offset),
            "joint {} outside its limits",
            link.joint
        );
    }
}

#[test]
fn arm_check_sweep_points_the_right_arm() {
    let rig = rig();
    let chain = rig.chain("right_arm").unwrap();
    let root = chain.rest_positions()[0];
    let reach = chain.total_length();

    for target in TargetSweep::arm_check() {
        let pose = solve(chain, target).unwrap();
        assert_within_limits(chain, &pose);

        assert!(!pose.reachable);
        assert!(!pose.constrained);
        assert_abs_diff_eq!(pose.bend_angle, 0.0, epsilon = 1e-3);

        let expected = root + (target - root).normalize() * reach;
        assert_abs_diff_eq!(pose.end_effector().distance(expected), 0.0, epsilon = 1e-4);
    }
}

#[test]
fn every_pose_respects_limits() {
    let rig = rig();
    let targets = TargetSweep::arm_check()
        .chain(TargetSweep::line(Vec3::new(-1.0, 0.5, 0.6), Vec3::new(1.0, 2.5, -0.4), 200));

    for target in targets {
        for chain in &rig.chains {
            let pose = solve(chain, target).unwrap();
            assert_within_limits(chain, &pose);
        }
    }
}

#[test]
fn arm_check_neighbourhood_is_smooth() {
    let rig = rig();

    for chain in &rig.chains {
        for centre in TargetSweep::arm_check() {
            for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                let sweep = TargetSweep::line(centre - axis * 0.05, centre + axis * 0.05, 100);
                let mut previous: Option<Pose> = None;

                for target in sweep {
                    let pose = solve(chain, target).unwrap();
                    if let Some(prev) = &previous {
                        assert_eq!(
                            pose.constrained,
                            prev.constrained,
                            "{} flips limits at {target}",
                            chain.name()
                        );
                        for (a, b) in pose.rotations.iter().zip(&prev.rotations) {
                            let step = a.offset.angle_between(b.offset);
                            assert!(step < 0.01, "{} jumps {step} rad at {target}", chain.name());
                        }
                    }
                    previous = Some(pose);
                }
            }
        }
    }
}

#[test]
fn reachable_target_is_touched() {
    let rig = rig();
    let chain = rig.chain("right_arm").unwrap();
    let target = Vec3::new(-0.3, 1.6, 0.3);

    let pose = solve(chain, target).unwrap();
    assert!(pose.reachable);
    assert!(pose.bend_angle > 0.1);
    if !pose.constrained {
        assert_abs_diff_eq!(pose.end_effector().distance(target), 0.0, epsilon = 1e-4);
    }
}

#[test]
fn limbs_solve_independently_in_parallel() {
    let rig = rig();
    let left = rig.chain("left_arm").unwrap();
    let right = rig.chain("right_arm").unwrap();
    let target = Vec3::new(0.0, 1.8, 0.4);

    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| solve(left, target));
        let b = scope.spawn(|| solve(right, target));
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a.unwrap(), solve(left, target).unwrap());
    assert_eq!(b.unwrap(), solve(right, target).unwrap());
}

#[test]
fn driver_moves_the_skeleton_hand() {
    let mut rig = rig();
    let chain = rig.chain("right_arm").unwrap().clone();
    let hand = rig.skeleton.find("RightHand").unwrap();
    let mut driver = LimbDriver::new(chain);

    let target = Vec3::new(-0.3, 1.6, 0.3);
    let pose = driver.update(&mut rig.skeleton, target, 1.0 / 60.0).unwrap().clone();

    let world = rig.skeleton.world_transforms();
    assert_abs_diff_eq!(world[hand].position.distance(pose.end_effector()), 0.0, epsilon = 1e-4);
}
