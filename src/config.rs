//! Tunable, non-geometric parameters of the widget
//!
//! Every field has a default, so an empty document (or any subset of the
//! sections) is a valid configuration. Flower shape parameters are fixed and
//! deliberately absent here.

use serde::{Deserialize, Serialize};

use crate::error::{FlowerError, Result};
use crate::math::Vec3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub motion: MotionConfig,
    pub particles: ParticleConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 2.0, 5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Fraction of the pending orbit applied per frame
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 0.5,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 50.0,
        }
    }
}

/// Per-frame increments, in radians
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub flower_spin: f32,
    pub particle_spin: f32,
    pub sparkle_yaw: f32,
    pub sparkle_pitch: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            flower_spin: 0.005,
            particle_spin: 0.0005,
            sparkle_yaw: 0.05,
            sparkle_pitch: 0.03,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Edge length of the cube the points are scattered in
    pub extent: f32,
    /// Base point size in world units
    pub size: f32,
    pub opacity: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            extent: 20.0,
            size: 0.05,
            opacity: 0.6,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// RGBA clear color; alpha 0 lets the page background show through
    pub clear_color: [f32; 4],
    pub exposure: f32,
    pub shadow_map_size: u32,
    /// Upper bound on devicePixelRatio for the backing store
    pub max_pixel_ratio: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 0.0],
            exposure: 1.5,
            shadow_map_size: 2048,
            max_pixel_ratio: 2.0,
        }
    }
}

impl FlowerConfig {
    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FlowerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(FlowerError::Config(format!("camera.fov must be in (0, 180), got {}", camera.fov)));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(FlowerError::Config("camera clip planes must satisfy 0 < near < far".into()));
        }

        let controls = &self.controls;
        if !(0.0..=1.0).contains(&controls.damping_factor) {
            return Err(FlowerError::Config("controls.damping_factor must be in [0, 1]".into()));
        }
        if !(controls.min_distance > 0.0 && controls.max_distance >= controls.min_distance) {
            return Err(FlowerError::Config(
                "controls distances must satisfy 0 < min_distance <= max_distance".into(),
            ));
        }

        if self.particles.count == 0 || self.particles.extent <= 0.0 {
            return Err(FlowerError::Config("particles need a positive count and extent".into()));
        }
        if !(0.0..=1.0).contains(&self.particles.opacity) {
            return Err(FlowerError::Config("particles.opacity must be in [0, 1]".into()));
        }

        if self.render.shadow_map_size == 0 || self.render.max_pixel_ratio <= 0.0 {
            return Err(FlowerError::Config(
                "render.shadow_map_size and render.max_pixel_ratio must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FlowerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = FlowerConfig::from_yaml("{}").unwrap();
        assert_eq!(config, FlowerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
camera:
  fov: 60
particles:
  count: 250
  seed: 7
"#;
        let config = FlowerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.particles.count, 250);
        assert_eq!(config.particles.seed, 7);
        assert_eq!(config.particles.extent, 20.0);
    }

    #[test]
    fn test_position_override() {
        let yaml = "camera:\n  position: { x: 1.0, y: 3.0, z: 6.0 }\n";
        let config = FlowerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.camera.position, Vec3::new(1.0, 3.0, 6.0));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            FlowerConfig::from_yaml("particles:\n  count: 0\n"),
            Err(FlowerError::Config(_))
        ));
        assert!(matches!(
            FlowerConfig::from_yaml("controls:\n  damping_factor: 1.5\n"),
            Err(FlowerError::Config(_))
        ));
        assert!(matches!(
            FlowerConfig::from_yaml("camera:\n  near: 10\n  far: 1\n"),
            Err(FlowerError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(matches!(
            FlowerConfig::from_yaml("camera: [1, 2"),
            Err(FlowerError::ConfigParse(_))
        ));
    }
}
