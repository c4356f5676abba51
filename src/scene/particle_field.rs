use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::math::{Mat4, Vec3};

/// Floats per point in the GPU buffer: xyz + size
pub const POINT_STRIDE: usize = 4;

/// Static cloud of background points that only turns as a whole
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    pub positions: Vec<Vec3>,
    /// Per-point size multiplier in [0, 2)
    pub sizes: Vec<f32>,
    pub rotation_y: f32,
    /// Base point size in world units
    pub base_size: f32,
    pub opacity: f32,
}

impl ParticleField {
    /// Scatter `count` points uniformly in a cube of edge `extent` around the origin
    pub fn generate(count: usize, extent: f32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);

        for _ in 0..count {
            positions.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            ));
            sizes.push(rng.gen::<f32>() * 2.0);
        }

        Self {
            positions,
            sizes,
            rotation_y: 0.0,
            base_size: 0.05,
            opacity: 0.6,
        }
    }

    pub fn from_config(config: &ParticleConfig) -> Self {
        let mut field = Self::generate(config.count, config.extent, config.seed);
        field.base_size = config.size;
        field.opacity = config.opacity;
        field
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn rotate(&mut self, delta: f32) {
        self.rotation_y += delta;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::rotation_y(self.rotation_y)
    }

    /// Interleaved position + size data for upload
    pub fn vertex_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.len() * POINT_STRIDE);
        for (p, size) in self.positions.iter().zip(&self.sizes) {
            data.extend_from_slice(&[p.x, p.y, p.z, *size]);
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_bounds() {
        let field = ParticleField::generate(1000, 20.0, 42);
        assert_eq!(field.len(), 1000);
        for p in &field.positions {
            assert!(p.x >= -10.0 && p.x < 10.0);
            assert!(p.y >= -10.0 && p.y < 10.0);
            assert!(p.z >= -10.0 && p.z < 10.0);
        }
        assert!(field.sizes.iter().all(|s| (0.0..2.0).contains(s)));
    }

    #[test]
    fn test_same_seed_same_field() {
        assert_eq!(ParticleField::generate(50, 20.0, 7), ParticleField::generate(50, 20.0, 7));
        assert_ne!(
            ParticleField::generate(50, 20.0, 7).positions,
            ParticleField::generate(50, 20.0, 8).positions
        );
    }

    #[test]
    fn test_vertex_data_layout() {
        let field = ParticleField::generate(3, 20.0, 1);
        let data = field.vertex_data();
        assert_eq!(data.len(), 3 * POINT_STRIDE);
        assert_eq!(data[4], field.positions[1].x);
        assert_eq!(data[7], field.sizes[1]);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut field = ParticleField::from_config(&ParticleConfig::default());
        assert_eq!(field.opacity, 0.6);
        for _ in 0..10 {
            field.rotate(0.0005);
        }
        assert!((field.rotation_y - 0.005).abs() < 1e-6);
    }
}
