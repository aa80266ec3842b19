use glam::Vec3;

/// A deterministic sequence of target points.
#[derive(Debug, Clone)]
pub struct TargetSweep {
    points: Vec<Vec3>,
    cursor: usize,
}

impl TargetSweep {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points, cursor: 0 }
    }

    /// Left, upper left, overhead and upper right of a character standing at
    /// the origin.
    pub fn arm_check() -> Self {
        Self::new(vec![
            Vec3::new(-1.0, 1.5, 0.0),
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.5, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        ])
    }

    /// `steps + 1` evenly spaced points from `from` to `to`, both included.
    pub fn line(from: Vec3, to: Vec3, steps: usize) -> Self {
        let steps = steps.max(1);
        Self::new(
            (0..=steps)
                .map(|i| from.lerp(to, i as f32 / steps as f32))
                .collect(),
        )
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

impl Iterator for TargetSweep {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        let point = self.points.get(self.cursor).copied();
        if point.is_some() {
            self.cursor += 1;
        }
        point
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TargetSweep {}
