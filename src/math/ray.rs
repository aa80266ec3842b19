use glam::{Mat4, Vec3, Vec4};

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Unprojects a normalized device coordinate through `view_proj`.
    ///
    /// Returns `None` when the matrix is singular or the unprojected points
    /// coincide.
    pub fn from_viewport(view_proj: Mat4, ndc_x: f32, ndc_y: f32) -> Option<Self> {
        if view_proj.determinant().abs() < f32::EPSILON {
            return None;
        }
        let inv_view_proj = view_proj.inverse();

        let near_point = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far_point = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near_point.w.abs() < f32::EPSILON || far_point.w.abs() < f32::EPSILON {
            return None;
        }

        let near = near_point.truncate() / near_point.w;
        let far = far_point.truncate() / far_point.w;

        let direction = (far - near).try_normalize()?;
        Some(Self {
            origin: near,
            direction,
        })
    }

    /// Hit with the plane `dot(normal, p) + offset = 0` in front of the origin.
    pub fn intersect_plane(&self, normal: Vec3, offset: f32) -> Option<Vec3> {
        let denom = self.direction.dot(normal);
        if denom.abs() <= 0.0001 {
            return None;
        }

        let t = -(self.origin.dot(normal) + offset) / denom;
        (t >= 0.0).then(|| self.at(t))
    }
}
