use crate::math::{Mat4, Vec3};
use super::material::rgb_hex;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Light shines from `position` towards the origin
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
}

impl DirectionalLight {
    pub fn new(hex: u32, intensity: f32, position: Vec3) -> Self {
        Self {
            color: rgb_hex(hex),
            intensity,
            position,
            cast_shadow: false,
            shadow_map_size: 0,
        }
    }

    pub fn with_shadow(mut self, map_size: u32) -> Self {
        self.cast_shadow = true;
        self.shadow_map_size = map_size;
        self
    }

    /// Unit vector pointing from the surface towards the light
    pub fn direction(&self) -> Vec3 {
        self.position.normalize()
    }

    /// View-projection of the shadow camera, fitted to a bounding sphere
    pub fn shadow_matrix(&self, center: Vec3, radius: f32) -> Mat4 {
        let radius = radius.max(0.01);
        let distance = self.position.length().max(radius * 2.0);
        let eye = center + self.direction().scale(distance);

        // Straight-down lights need a different up vector
        let up = if self.direction().cross(&Vec3::UP).length_squared() < 1e-6 {
            Vec3::FORWARD
        } else {
            Vec3::UP
        };

        let view = Mat4::look_at(eye, center, up);
        let projection = Mat4::orthographic(
            -radius,
            radius,
            -radius,
            radius,
            (distance - radius).max(0.01),
            distance + radius,
        );
        projection.mul(&view)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// Key light, two tinted fills and a dim ambient term
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub key: DirectionalLight,
    pub fills: [DirectionalLight; 2],
    pub ambient: AmbientLight,
}

impl Lighting {
    pub fn standard(shadow_map_size: u32) -> Self {
        Self {
            key: DirectionalLight::new(0xffffff, 1.0, Vec3::new(0.0, 10.0, 5.0)).with_shadow(shadow_map_size),
            fills: [
                DirectionalLight::new(0xffd1d1, 0.5, Vec3::new(-5.0, 3.0, 5.0)),
                DirectionalLight::new(0xd1e8ff, 0.5, Vec3::new(5.0, 3.0, 5.0)),
            ],
            ambient: AmbientLight {
                color: rgb_hex(0x404040),
                intensity: 0.5,
            },
        }
    }

    pub fn directional(&self) -> impl Iterator<Item = &DirectionalLight> {
        std::iter::once(&self.key).chain(self.fills.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rig() {
        let lighting = Lighting::standard(2048);
        assert_eq!(lighting.directional().count(), 3);
        assert!(lighting.key.cast_shadow);
        assert_eq!(lighting.key.shadow_map_size, 2048);
        assert!(lighting.fills.iter().all(|l| !l.cast_shadow));
        assert_eq!(lighting.fills[0].intensity, 0.5);
        assert!((lighting.ambient.color.x - 64.0 / 255.0).abs() < 0.0001);
    }

    #[test]
    fn test_shadow_matrix_maps_center_inside_clip_volume() {
        let light = Lighting::standard(1024).key;
        let m = light.shadow_matrix(Vec3::ZERO, 2.0);

        let c = m.transform_point(Vec3::ZERO);
        assert!(c.x.abs() < 0.0001);
        assert!(c.y.abs() < 0.0001);
        assert!(c.z > -1.0 && c.z < 1.0);

        // A point on the sphere edge stays inside the box
        let edge = m.transform_point(Vec3::new(1.9, 0.0, 0.0));
        assert!(edge.x.abs() <= 1.0);
    }

    #[test]
    fn test_shadow_matrix_overhead_light() {
        let light = DirectionalLight::new(0xffffff, 1.0, Vec3::new(0.0, 10.0, 0.0));
        let m = light.shadow_matrix(Vec3::ZERO, 1.0);
        assert!(m.data.iter().all(|v| v.is_finite()));
    }
}
