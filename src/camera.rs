use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Perspective camera on the +Z axis looking at the black hole.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl From<&CameraConfig> for Camera {
    fn from(c: &CameraConfig) -> Self {
        Self {
            fov_deg: c.fov_deg,
            near: c.near,
            far: c.far,
            distance: c.distance,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::from(&CameraConfig::default())
    }
}

impl Camera {
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// World point to pixel coordinates (origin top-left) on a `size` viewport.
    pub fn project(&self, point: Vec3, size: Vec2) -> Vec2 {
        let clip = self.view_projection(size.x / size.y) * point.extend(1.0);
        let ndc = Vec2::new(clip.x, clip.y) / clip.w;
        Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
    }
}

/// Model matrix for a ring lying in its local XY plane.
pub fn ring_model(rotation: Vec3) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lands_mid_screen() {
        let cam = Camera::default();
        let p = cam.project(Vec3::ZERO, Vec2::new(800.0, 600.0));
        assert!((p - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn degenerate_aspect_falls_back() {
        let cam = Camera::default();
        assert_eq!(cam.projection(0.0), cam.projection(1.0));
    }

    #[test]
    fn ring_spin_keeps_plane() {
        let tilt = Vec3::new(-0.3, 0.2, 0.0);
        let normal = ring_model(tilt).transform_vector3(Vec3::Z);
        let spun = ring_model(tilt + Vec3::new(0.0, 0.0, 1.1)).transform_vector3(Vec3::Z);
        assert!((normal - spun).length() < 1e-5);
    }
}
