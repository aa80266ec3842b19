//! Runs the arm check sweep against a rig: `aim-demo [rig.json] [chain]`.

use limb_aim::config::{Rig, RigConfig};
use limb_aim::driver::LimbDriver;
use limb_aim::error::ConfigError;
use limb_aim::sweep::TargetSweep;
use log::{error, info};

const DEFAULT_RIG: &str = include_str!("../assets/xbot_arms.json");
const FRAME_TIME: f32 = 1.0 / 60.0;

fn load(path: Option<&str>) -> Result<Rig, ConfigError> {
    let config = match path {
        Some(path) => RigConfig::load(path)?,
        None => RigConfig::from_json(DEFAULT_RIG)?,
    };
    config.build()
}

fn run(path: Option<&str>, chain: Option<&str>) -> Result<(), ConfigError> {
    let mut rig = load(path)?;
    let chain = match chain {
        Some(name) => rig.chain(name)?.clone(),
        None => rig
            .chains
            .first()
            .cloned()
            .ok_or_else(|| ConfigError::UnknownChain(String::from("<none defined>")))?,
    };
    info!("aiming `{}` ({} joints)", chain.name(), chain.joint_count());

    let mut driver = LimbDriver::new(chain);
    for target in TargetSweep::arm_check() {
        let Some(pose) = driver.update(&mut rig.skeleton, target, FRAME_TIME) else {
            continue;
        };

        let hand = pose.end_effector();
        println!(
            "target {:>6.2} {:>6.2} {:>6.2} -> hand {:>6.3} {:>6.3} {:>6.3}  bend {:>6.1} deg{}{}",
            target.x,
            target.y,
            target.z,
            hand.x,
            hand.y,
            hand.z,
            pose.bend_angle.to_degrees(),
            if pose.reachable { "" } else { "  out of reach" },
            if pose.constrained { "  limited" } else { "" },
        );
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(
        args.first().map(String::as_str),
        args.get(1).map(String::as_str),
    ) {
        error!("{err}");
        std::process::exit(1);
    }
}
