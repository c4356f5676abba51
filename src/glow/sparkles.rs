use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::math::{Mat4, Transform, Vec3};

/// A small twinkling sphere around the flower center
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkle {
    pub position: Vec3,
    pub rotation: Vec3,
    pub opacity: f32,
    /// Pulse rate against the wall clock, in radians per millisecond
    pub speed: f32,
}

impl Sparkle {
    /// Random sparkle on a spherical shell of radius [0.5, 1.0)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let radius = rng.gen_range(0.5..1.0);
        let theta = rng.gen_range(0.0..TAU);
        let phi = rng.gen_range(0.0..PI);

        Self {
            position: Vec3::from_spherical(radius, theta, phi),
            rotation: Vec3::ZERO,
            opacity: rng.gen_range(0.5..1.0),
            speed: rng.gen_range(0.01..0.03),
        }
    }

    /// Spin by the per-frame increments and pulse opacity with the clock
    pub fn animate(&mut self, now_ms: f64, yaw: f32, pitch: f32) {
        self.rotation.y += yaw;
        self.rotation.x += pitch;
        self.opacity = pulse_opacity(now_ms, self.speed);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Transform::from_position(self.position)
            .with_rotation(self.rotation)
            .matrix()
    }
}

/// Opacity in [0, 1] as a function of time only
pub fn pulse_opacity(now_ms: f64, speed: f32) -> f32 {
    (0.5 + 0.5 * (now_ms * speed as f64).sin()) as f32
}

/// The current sparkle population; only ever swapped out wholesale
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparklePool {
    sparkles: Vec<Sparkle>,
}

impl SparklePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every sparkle and install the new set
    pub fn replace_all(&mut self, sparkles: Vec<Sparkle>) {
        self.sparkles = sparkles;
    }

    pub fn len(&self) -> usize {
        self.sparkles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparkles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sparkle> {
        self.sparkles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Sparkle> {
        self.sparkles.iter_mut()
    }
}
