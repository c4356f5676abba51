use std::f32::consts::{PI, TAU};

use crate::config::ControlsConfig;
use crate::math::Vec3;
use crate::scene::PerspectiveCamera;

/// Keeps the polar angle off the poles, where the view matrix degenerates
const POLAR_EPSILON: f32 = 1.0e-6;

/// Damped orbit around a fixed target, driven by pointer deltas in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, measured from +X towards +Z
    pub theta: f32,
    /// Polar angle from +Y
    pub phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig, camera: &PerspectiveCamera, viewport_height: u32) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length().max(f32::EPSILON);

        Self {
            target: camera.target,
            radius,
            theta: offset.z.atan2(offset.x),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            pending_theta: 0.0,
            pending_phi: 0.0,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            viewport_height: viewport_height.max(1) as f32,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    /// Queue a drag of `dx`, `dy` pixels; a full viewport height is one turn at speed 1
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let per_pixel = TAU * self.rotate_speed / self.viewport_height;
        self.pending_theta += dx * per_pixel;
        self.pending_phi -= dy * per_pixel;
    }

    /// Positive steps move closer
    pub fn zoom(&mut self, steps: f32) {
        let factor = 0.95f32.powf(steps * self.zoom_speed);
        self.radius = (self.radius * factor).clamp(self.min_distance, self.max_distance);
    }

    /// True while queued rotation is still being eased in
    pub fn is_moving(&self) -> bool {
        self.pending_theta.abs() > 1.0e-6 || self.pending_phi.abs() > 1.0e-6
    }

    /// Apply a damped share of the queued rotation and move the camera
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        if self.damping_factor > 0.0 {
            self.theta += self.pending_theta * self.damping_factor;
            self.phi += self.pending_phi * self.damping_factor;
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.theta += self.pending_theta;
            self.phi += self.pending_phi;
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }

        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        camera.position = self.target + Vec3::from_spherical(self.radius, self.theta, self.phi);
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn setup() -> (OrbitControls, PerspectiveCamera) {
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 800, 600);
        (OrbitControls::new(&ControlsConfig::default(), &camera, 600), camera)
    }

    #[test]
    fn test_idle_update_keeps_camera() {
        let (mut controls, mut camera) = setup();
        let before = camera.position;
        controls.update(&mut camera);
        assert!(camera.position.distance(&before) < 1e-4);
        assert!((controls.radius - 29.0f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_damped_rotation_converges() {
        let (mut controls, mut camera) = setup();
        let start = controls.theta;
        controls.rotate(60.0, 0.0);
        let expected = TAU * 0.5 * 60.0 / 600.0;

        controls.update(&mut camera);
        let first = controls.theta - start;
        assert!((first - expected * 0.05).abs() < 1e-5);

        for _ in 0..1000 {
            controls.update(&mut camera);
        }
        assert!((controls.theta - start - expected).abs() < 1e-3);
        assert!(!controls.is_moving());
        assert!((camera.position.length() - controls.radius).abs() < 1e-4);
    }

    #[test]
    fn test_polar_clamp() {
        let (mut controls, mut camera) = setup();
        controls.rotate(0.0, -100_000.0);
        for _ in 0..200 {
            controls.update(&mut camera);
        }
        assert!(controls.phi <= PI - POLAR_EPSILON);
        assert!(camera.position.y < 0.0);
        assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
    }

    #[test]
    fn test_zoom_clamps() {
        let (mut controls, mut camera) = setup();
        let r = controls.radius;
        controls.zoom(1.0);
        assert!((controls.radius - r * 0.95).abs() < 1e-5);

        controls.zoom(1000.0);
        assert_eq!(controls.radius, 1.0);
        controls.zoom(-1000.0);
        assert_eq!(controls.radius, 50.0);

        controls.update(&mut camera);
        assert!((camera.position.length() - 50.0).abs() < 1e-3);
    }
}
