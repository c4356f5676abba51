//! Maps elapsed days to emissive glow and a sparkle population

pub mod controller;
pub mod sparkles;

pub use controller::{glow_intensity, sparkle_count, GlowController, GlowLevel};
pub use sparkles::{pulse_opacity, Sparkle, SparklePool};
