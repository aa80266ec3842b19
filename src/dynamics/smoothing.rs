use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Spring parameters for [`TargetSmoother`].
///
/// `frequency` is the natural frequency in Hz, `damping` the damping ratio
/// (1 = critically damped) and `response` the initial reaction (negative
/// values anticipate, values above 1 overshoot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub frequency: f32,
    pub damping: f32,
    pub response: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::SMOOTH
    }
}

impl SpringParams {
    pub const SMOOTH: Self = Self::new(2.0, 1.0, 0.0);
    pub const SNAPPY: Self = Self::new(4.0, 0.5, 2.0);
    pub const BOUNCY: Self = Self::new(3.0, 0.3, 1.0);
    pub const SLUGGISH: Self = Self::new(1.0, 1.5, 0.0);

    pub const fn new(frequency: f32, damping: f32, response: f32) -> Self {
        Self {
            frequency,
            damping,
            response,
        }
    }

    fn constants(&self) -> (f32, f32, f32) {
        let omega = 2.0 * PI * self.frequency;
        let k1 = self.damping / (PI * self.frequency);
        let k2 = 1.0 / (omega * omega);
        let k3 = self.response * self.damping / (2.0 * PI * self.frequency);
        (k1, k2, k3)
    }
}

/// Second-order spring that eases a target point toward its input.
#[derive(Debug, Clone)]
pub struct TargetSmoother {
    position: Vec3,
    velocity: Vec3,
    last_input: Vec3,
    k1: f32,
    k2: f32,
    k3: f32,
}

impl TargetSmoother {
    pub fn new(params: SpringParams, initial: Vec3) -> Self {
        let (k1, k2, k3) = params.constants();
        Self {
            position: initial,
            velocity: Vec3::ZERO,
            last_input: initial,
            k1,
            k2,
            k3,
        }
    }

    pub fn set_params(&mut self, params: SpringParams) {
        (self.k1, self.k2, self.k3) = params.constants();
    }

    pub fn reset(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.last_input = position;
    }

    /// Advances by `dt` seconds toward `input`.
    pub fn update(&mut self, input: Vec3, dt: f32) -> Vec3 {
        if dt <= 0.0 {
            return self.position;
        }

        let input_velocity = (input - self.last_input) / dt;
        self.last_input = input;

        // keeps the explicit integration stable for large dt
        let k2 = self
            .k2
            .max(dt * dt / 2.0 + dt * self.k1 / 2.0)
            .max(dt * self.k1);

        self.position += self.velocity * dt;
        let accel = (input + input_velocity * self.k3 - self.position - self.velocity * self.k1) / k2;
        self.velocity += accel * dt;

        self.position
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_a_still_target() {
        let mut smoother = TargetSmoother::new(SpringParams::SMOOTH, Vec3::ZERO);
        let goal = Vec3::new(1.0, 2.0, 0.0);

        for _ in 0..600 {
            smoother.update(goal, 1.0 / 60.0);
        }
        assert!(smoother.position().distance(goal) < 1e-3);
    }

    #[test]
    fn first_step_does_not_jump() {
        let mut smoother = TargetSmoother::new(SpringParams::SMOOTH, Vec3::ZERO);
        let first = smoother.update(Vec3::new(1.0, 0.0, 0.0), 1.0 / 60.0);
        assert!(first.length() < 0.5);
    }

    #[test]
    fn non_positive_dt_is_a_no_op() {
        let mut smoother = TargetSmoother::new(SpringParams::SNAPPY, Vec3::ONE);
        assert_eq!(smoother.update(Vec3::ZERO, 0.0), Vec3::ONE);
        assert_eq!(smoother.update(Vec3::ZERO, -1.0), Vec3::ONE);
    }
}
