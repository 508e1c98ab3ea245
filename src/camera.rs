use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            eye: config.eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn get_vp_matrix(&self) -> Mat4 {
        self.projection * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_follows_aspect() {
        let mut camera = Camera::new(&CameraConfig::default(), 1.0);
        let before = camera.projection();

        camera.set_aspect(2.0);

        assert_eq!(camera.aspect(), 2.0);
        assert_ne!(before, camera.projection());
        // x scale of a perspective matrix is f / aspect
        let f = 1.0 / (75.0f32.to_radians() / 2.0).tan();
        assert!((camera.projection().x_axis.x - f / 2.0).abs() < 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let clip = camera.get_vp_matrix().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }
}
