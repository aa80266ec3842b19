//! WASM entry point - limb aiming for a JavaScript render loop
//!
//! The host engine owns the scene. Each frame it calls `aim` (or
//! `aim_at_screen`) and copies the returned local rotations onto the bones
//! named by `joint_names` before rendering.

use crate::config::{Rig, RigConfig};
use crate::driver::LimbDriver;
use crate::dynamics::SpringParams;
use crate::math::{Mat4, Ray, Vec3};
use wasm_bindgen::prelude::*;

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct ArmAimer {
    rig: Rig,
    driver: LimbDriver,
}

#[wasm_bindgen]
impl ArmAimer {
    #[wasm_bindgen(constructor)]
    pub fn new(rig_json: &str, chain: &str) -> Result<ArmAimer, JsValue> {
        let rig = RigConfig::from_json(rig_json)
            .and_then(|config| config.build())
            .map_err(to_js)?;
        let chain = rig.chain(chain).map_err(to_js)?.clone();

        Ok(Self {
            rig,
            driver: LimbDriver::new(chain),
        })
    }

    /// Eases the limb toward targets instead of snapping to them.
    pub fn enable_smoothing(&mut self, frequency: f32, damping: f32, response: f32) {
        self.driver
            .set_smoothing(SpringParams::new(frequency, damping, response));
    }

    /// Points the elbow toward `(x, y, z)` in skeleton space.
    pub fn set_pole(&mut self, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        let pole = Vec3::new(x, y, z);
        if !pole.is_finite() {
            return Err(JsValue::from_str("pole must be finite"));
        }
        self.driver.set_pole(Some(pole));
        Ok(())
    }

    /// Names of the chain's joints, root first, as a JSON array.
    pub fn joint_names(&self) -> String {
        let names: Vec<&str> = self
            .driver
            .chain()
            .joints()
            .filter_map(|i| self.rig.skeleton.joint(i))
            .map(|j| j.name.as_str())
            .collect();
        serde_json::to_string(&names).unwrap_or_default()
    }

    /// Aims at a skeleton-space point and returns `[x, y, z, w]` local
    /// rotations for every chain joint.
    pub fn aim(&mut self, x: f32, y: f32, z: f32, dt: f32) -> Result<Vec<f32>, JsValue> {
        let target = Vec3::new(x, y, z);
        self.driver
            .update(&mut self.rig.skeleton, target, dt)
            .map(|pose| {
                pose.rotations
                    .iter()
                    .flat_map(|r| r.local.to_array())
                    .collect()
            })
            .ok_or_else(|| JsValue::from_str("no valid pose yet"))
    }

    /// Aims at the point under a screen position on the plane `z = plane_z`.
    ///
    /// `view_proj` is the camera's column-major projection * view matrix.
    pub fn aim_at_screen(
        &mut self,
        ndc_x: f32,
        ndc_y: f32,
        view_proj: &[f32],
        plane_z: f32,
        dt: f32,
    ) -> Result<Vec<f32>, JsValue> {
        if view_proj.len() != 16 {
            return Err(JsValue::from_str("view_proj must have 16 elements"));
        }

        let target = Ray::from_viewport(Mat4::from_cols_slice(view_proj), ndc_x, ndc_y)
            .and_then(|ray| ray.intersect_plane(Vec3::Z, -plane_z))
            .ok_or_else(|| JsValue::from_str("screen point does not hit the target plane"))?;

        self.aim(target.x, target.y, target.z, dt)
    }

    pub fn reachable(&self) -> bool {
        self.driver.last_pose().map_or(false, |p| p.reachable)
    }

    pub fn constrained(&self) -> bool {
        self.driver.last_pose().map_or(false, |p| p.constrained)
    }

    pub fn reset(&mut self) {
        self.rig.skeleton.reset_pose();
        self.driver.reset();
    }
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Warn).ok();
}
