use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::scene::MaterialHandle;
use super::sparkles::{Sparkle, SparklePool};

pub const PETAL_BASE_EMISSIVE: f32 = 0.05;
pub const CENTER_BASE_EMISSIVE: f32 = 0.1;
pub const MAX_SPARKLES: usize = 20;
/// Sparkles only appear above this intensity
pub const SPARKLE_THRESHOLD: f64 = 0.2;

/// Normalized glow in [0, 1]: one percent per day, saturating at 100 days
pub fn glow_intensity(days: u32) -> f64 {
    (days as f64 * 0.01).min(1.0)
}

pub fn petal_emissive(intensity: f64) -> f32 {
    (PETAL_BASE_EMISSIVE as f64 + intensity * 0.3) as f32
}

pub fn center_emissive(intensity: f64) -> f32 {
    (CENTER_BASE_EMISSIVE as f64 + intensity * 0.4) as f32
}

pub fn sparkle_count(intensity: f64) -> usize {
    if intensity > SPARKLE_THRESHOLD {
        (intensity * MAX_SPARKLES as f64).floor() as usize
    } else {
        0
    }
}

/// Result of one glow update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowLevel {
    pub days: u32,
    pub intensity: f64,
    pub petal_emissive: f32,
    pub center_emissive: f32,
    pub sparkle_count: usize,
}

impl GlowLevel {
    pub fn for_days(days: u32) -> Self {
        let intensity = glow_intensity(days);
        Self {
            days,
            intensity,
            petal_emissive: petal_emissive(intensity),
            center_emissive: center_emissive(intensity),
            sparkle_count: sparkle_count(intensity),
        }
    }
}

/// Sole writer of the petal and center emissive intensities
#[derive(Debug, Clone)]
pub struct GlowController {
    petal: MaterialHandle,
    center: MaterialHandle,
    rng: SmallRng,
    level: GlowLevel,
}

impl GlowController {
    pub fn new(petal: MaterialHandle, center: MaterialHandle, seed: u64) -> Self {
        Self {
            petal,
            center,
            rng: SmallRng::seed_from_u64(seed),
            level: GlowLevel::for_days(0),
        }
    }

    /// Drive materials and the sparkle population from elapsed days
    pub fn update(&mut self, days: u32, sparkles: &mut SparklePool) -> GlowLevel {
        let level = GlowLevel::for_days(days);

        self.petal.set_emissive_intensity(level.petal_emissive);
        self.center.set_emissive_intensity(level.center_emissive);

        sparkles.replace_all(
            (0..level.sparkle_count)
                .map(|_| Sparkle::random(&mut self.rng))
                .collect(),
        );

        log::debug!(
            "Glow for {} days: intensity {:.2}, {} sparkles",
            days,
            level.intensity,
            level.sparkle_count
        );

        self.level = level;
        level
    }

    pub fn level(&self) -> GlowLevel {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Material;

    fn controller() -> (GlowController, MaterialHandle, MaterialHandle) {
        let petal = MaterialHandle::new(Material::petal());
        let center = MaterialHandle::new(Material::center());
        (GlowController::new(petal.clone(), center.clone(), 9), petal, center)
    }

    #[test]
    fn test_sparkle_counts() {
        assert_eq!(GlowLevel::for_days(25).sparkle_count, 5);
        assert_eq!(GlowLevel::for_days(19).sparkle_count, 0);
        assert_eq!(GlowLevel::for_days(20).sparkle_count, 0);
        assert_eq!(GlowLevel::for_days(21).sparkle_count, 4);
        assert_eq!(GlowLevel::for_days(100).sparkle_count, 20);
        assert_eq!(GlowLevel::for_days(5000).sparkle_count, 20);
    }

    #[test]
    fn test_zero_days() {
        let level = GlowLevel::for_days(0);
        assert_eq!(level.intensity, 0.0);
        assert_eq!(level.petal_emissive, 0.05);
        assert_eq!(level.center_emissive, 0.1);
    }

    #[test]
    fn test_update_writes_shared_materials() {
        let (mut glow, petal, center) = controller();
        let mut pool = SparklePool::new();

        let level = glow.update(100, &mut pool);
        assert!((petal.emissive_intensity() - 0.35).abs() < 1e-6);
        assert!((center.emissive_intensity() - 0.5).abs() < 1e-6);
        assert_eq!(pool.len(), 20);
        assert_eq!(glow.level(), level);
    }

    #[test]
    fn test_update_is_idempotent() {
        let (mut glow, petal, center) = controller();
        let mut pool = SparklePool::new();

        glow.update(42, &mut pool);
        let (p, c, n) = (petal.emissive_intensity(), center.emissive_intensity(), pool.len());
        glow.update(42, &mut pool);
        assert_eq!(petal.emissive_intensity(), p);
        assert_eq!(center.emissive_intensity(), c);
        assert_eq!(pool.len(), n);
    }

    #[test]
    fn test_dropping_below_threshold_empties_pool() {
        let (mut glow, _, _) = controller();
        let mut pool = SparklePool::new();
        glow.update(80, &mut pool);
        assert_eq!(pool.len(), 16);
        glow.update(3, &mut pool);
        assert!(pool.is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_levels_stay_in_range(days in 0u32..100_000) {
                let level = GlowLevel::for_days(days);
                prop_assert!((0.0..=1.0).contains(&level.intensity));
                prop_assert!(level.petal_emissive >= 0.05 && level.petal_emissive <= 0.35 + 1e-6);
                prop_assert!(level.center_emissive >= 0.1 && level.center_emissive <= 0.5 + 1e-6);
                prop_assert!(level.sparkle_count <= MAX_SPARKLES);
            }

            #[test]
            fn prop_levels_are_monotonic(days in 0u32..100_000, step in 0u32..500) {
                let a = GlowLevel::for_days(days);
                let b = GlowLevel::for_days(days + step);
                prop_assert!(b.intensity >= a.intensity);
                prop_assert!(b.petal_emissive >= a.petal_emissive);
                prop_assert!(b.center_emissive >= a.center_emissive);
                prop_assert!(b.sparkle_count >= a.sparkle_count);
            }
        }
    }
}
