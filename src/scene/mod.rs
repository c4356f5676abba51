//! Scene graph: lights, camera, flower group, background field and sparkles

pub mod material;
pub mod light;
pub mod camera;
pub mod flower;
pub mod particle_field;
pub mod sprite;

pub use material::{rgb_hex, Material, MaterialHandle};
pub use light::{AmbientLight, DirectionalLight, Lighting};
pub use camera::PerspectiveCamera;
pub use flower::{Flower, FlowerMeshes, MeshInstance, PartKind};
pub use particle_field::{ParticleField, POINT_STRIDE};
pub use sprite::SpriteTexture;

use crate::animation::OrbitControls;
use crate::config::FlowerConfig;
use crate::geometry::{uv_sphere, Mesh};
use crate::glow::SparklePool;

pub const SPARKLE_RADIUS: f32 = 0.03;
pub const SPRITE_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Everything that gets drawn, plus the camera and its controls
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub lighting: Lighting,
    pub flower: Flower,
    pub particles: ParticleField,
    pub sprite: SpriteTexture,
    pub sparkles: SparklePool,
    pub sparkle_mesh: Mesh,
    pub viewport: Viewport,
}

impl Scene {
    pub fn assemble(config: &FlowerConfig, width: u32, height: u32) -> Self {
        let camera = PerspectiveCamera::new(&config.camera, width, height);
        let controls = OrbitControls::new(&config.controls, &camera, height);

        Self {
            camera,
            controls,
            lighting: Lighting::standard(config.render.shadow_map_size),
            flower: Flower::build(),
            particles: ParticleField::from_config(&config.particles),
            sprite: SpriteTexture::radial_gradient(SPRITE_SIZE),
            sparkles: SparklePool::new(),
            sparkle_mesh: uv_sphere(SPARKLE_RADIUS, 8, 8),
            viewport: Viewport {
                width: width.max(1),
                height: height.max(1),
            },
        }
    }

    /// Apply a new viewport size; zero-sized dimensions are ignored
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.camera.resize(width, height) {
            return false;
        }
        self.viewport = Viewport { width, height };
        self.controls.set_viewport_height(height);
        log::debug!("Scene resized to {}x{}", width, height);
        true
    }
}
