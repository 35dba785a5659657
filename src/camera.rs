//! Perspective camera aimed at a target point.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, target: Vec3) -> Self {
        Self {
            fov_deg: config.fov_deg,
            aspect: 1.0,
            near: config.near,
            far: config.far,
            position: Vec3::from(config.position),
            target,
        }
    }

    /// Matches the projection to a `width` x `height` viewport. A zero-sized
    /// viewport is ignored and reported with `false`.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> bool {
        if !(width > 0.0 && height > 0.0) {
            return false;
        }
        self.aspect = (width / height) as f32;
        true
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_is_ignored() {
        let mut camera = PerspectiveCamera::new(&CameraConfig::default(), Vec3::ZERO);
        assert!(camera.set_viewport(800.0, 600.0));
        assert!(!camera.set_viewport(800.0, 0.0));
        assert_eq!(camera.aspect, (800.0f64 / 600.0) as f32);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let camera = PerspectiveCamera::new(&CameraConfig::default(), Vec3::new(0.0, 0.8, 0.0));
        let ndc = camera.view_projection().project_point3(camera.target);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    }
}
