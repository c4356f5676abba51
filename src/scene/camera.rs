use crate::config::CameraConfig;
use crate::math::{Mat4, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov: config.fov,
            aspect: 1.0,
            near: config.near,
            far: config.far,
            position: config.position,
            target: Vec3::ZERO,
        };
        camera.resize(width, height);
        camera
    }

    /// Match the aspect ratio to a new viewport.
    ///
    /// Returns false, leaving the camera untouched, for a zero-sized viewport.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, Vec3::UP)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix().mul(&self.view_matrix())
    }
}
