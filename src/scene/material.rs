use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::math::Vec3;

/// Convert a 0xRRGGBB color to linear RGB in [0, 1]
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Physically-inspired surface description shared by every instance of a part
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub emissive: Vec3,
    /// Self-illumination strength, driven by the glow controller
    pub emissive_intensity: f32,
    pub opacity: f32,
    /// Unlit materials ignore scene lights
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 1.0,
            metalness: 0.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            opacity: 1.0,
            unlit: false,
        }
    }
}

impl Material {
    pub fn petal() -> Self {
        Self {
            color: rgb_hex(0xff0a47),
            roughness: 0.3,
            metalness: 0.1,
            clearcoat: 0.4,
            clearcoat_roughness: 0.2,
            emissive: rgb_hex(0xff0a47),
            emissive_intensity: 0.05,
            ..Default::default()
        }
    }

    pub fn center() -> Self {
        Self {
            color: rgb_hex(0xffcc00),
            roughness: 0.5,
            metalness: 0.2,
            emissive: rgb_hex(0xffcc00),
            emissive_intensity: 0.1,
            ..Default::default()
        }
    }

    /// Stem and leaves
    pub fn stem() -> Self {
        Self {
            color: rgb_hex(0x0a5f2c),
            roughness: 0.7,
            metalness: 0.0,
            ..Default::default()
        }
    }

    /// White unlit material for sparkles; opacity is set per sparkle
    pub fn sparkle() -> Self {
        Self {
            unlit: true,
            ..Default::default()
        }
    }
}

/// Shared, reference-counted material.
///
/// Every mesh instance of a part holds a clone of the same handle, so writing
/// through one handle changes all of them at once.
#[derive(Debug, Clone)]
pub struct MaterialHandle(Rc<RefCell<Material>>);

impl MaterialHandle {
    pub fn new(material: Material) -> Self {
        Self(Rc::new(RefCell::new(material)))
    }

    pub fn borrow(&self) -> Ref<'_, Material> {
        self.0.borrow()
    }

    pub fn emissive_intensity(&self) -> f32 {
        self.0.borrow().emissive_intensity
    }

    pub fn set_emissive_intensity(&self, intensity: f32) {
        self.0.borrow_mut().emissive_intensity = intensity;
    }

    /// True when both handles refer to the same material
    pub fn ptr_eq(&self, other: &MaterialHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
