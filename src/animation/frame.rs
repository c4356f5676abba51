use crate::config::MotionConfig;
use crate::scene::Scene;

/// Per-frame scene update; rendering is left to the caller
#[derive(Debug, Clone)]
pub struct AnimationLoop {
    motion: MotionConfig,
    frames: u64,
}

impl AnimationLoop {
    pub fn new(motion: MotionConfig) -> Self {
        Self { motion, frames: 0 }
    }

    pub fn step(&mut self, scene: &mut Scene, now_ms: f64) {
        scene.flower.group.rotation.y += self.motion.flower_spin;
        scene.particles.rotate(self.motion.particle_spin);

        for sparkle in scene.sparkles.iter_mut() {
            sparkle.animate(now_ms, self.motion.sparkle_yaw, self.motion.sparkle_pitch);
        }

        scene.controls.update(&mut scene.camera);
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
