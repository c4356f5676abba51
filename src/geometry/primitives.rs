use std::f32::consts::{PI, TAU};

use crate::math::Vec3;
use super::mesh::{Mesh, Vertex};

/// Closed cylinder centred on the origin, axis along Y
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: usize) -> Mesh {
    let segments = radial_segments.max(3);
    let half = height / 2.0;
    let mut mesh = Mesh::new();

    // Side normals lean outward by the taper slope
    let slope = (radius_bottom - radius_top) / height;

    let mut rings = [0u32; 2];
    for (ring, (y, radius)) in [(half, radius_top), (-half, radius_bottom)].into_iter().enumerate() {
        rings[ring] = mesh.add_vertices((0..=segments).map(|i| {
            let u = i as f32 / segments as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            Vertex::new(
                Vec3::new(radius * sin, y, radius * cos),
                Vec3::new(sin, slope, cos).normalize(),
            )
            .with_uv(u, 1.0 - ring as f32)
        }));
    }

    for i in 0..segments as u32 {
        let (top, bottom) = (rings[0] + i, rings[1] + i);
        mesh.add_quad(top, bottom, bottom + 1, top + 1);
    }

    for (y, radius, normal) in [(half, radius_top, Vec3::UP), (-half, radius_bottom, -Vec3::UP)] {
        let center = mesh.add_vertices(std::iter::once(
            Vertex::new(Vec3::new(0.0, y, 0.0), normal).with_uv(0.5, 0.5),
        ));
        let rim = mesh.add_vertices((0..=segments).map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            Vertex::new(Vec3::new(radius * sin, y, radius * cos), normal)
                .with_uv(0.5 + 0.5 * sin, 0.5 + 0.5 * cos)
        }));
        for i in 0..segments as u32 {
            if normal.y > 0.0 {
                mesh.add_triangle(center, rim + i, rim + i + 1);
            } else {
                mesh.add_triangle(center, rim + i + 1, rim + i);
            }
        }
    }

    mesh.calculate_bounds();
    mesh
}

/// UV sphere centred on the origin
pub fn uv_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let slices = width_segments.max(3);
    let stacks = height_segments.max(2);
    let mut mesh = Mesh::new();

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * PI;

        mesh.add_vertices((0..=slices).map(|slice| {
            let u = slice as f32 / slices as f32;
            let normal = Vec3::from_spherical(1.0, u * TAU, phi);
            Vertex::new(normal.scale(radius), normal).with_uv(u, 1.0 - v)
        }));
    }

    let ring = (slices + 1) as u32;
    for stack in 0..stacks as u32 {
        for slice in 0..slices as u32 {
            let i0 = stack * ring + slice;
            let i1 = i0 + 1;
            let i2 = (stack + 1) * ring + slice;
            let i3 = i2 + 1;

            // Poles collapse to a single row of triangles
            if stack != 0 {
                mesh.add_triangle(i0, i1, i2);
            }
            if stack != stacks as u32 - 1 {
                mesh.add_triangle(i1, i3, i2);
            }
        }
    }

    mesh.calculate_bounds();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_counts() {
        let mesh = cylinder(0.05, 0.07, 3.0, 12);
        // two side rings + two caps (center + rim), seams duplicated
        assert_eq!(mesh.vertex_count(), 2 * 13 + 2 * (1 + 13));
        assert_eq!(mesh.triangle_count(), 12 * 2 + 12 * 2);
    }

    #[test]
    fn test_cylinder_extent() {
        let mesh = cylinder(0.05, 0.07, 3.0, 12);
        let max_y = mesh.vertices.iter().map(|v| v.position.y).fold(f32::MIN, f32::max);
        let min_y = mesh.vertices.iter().map(|v| v.position.y).fold(f32::MAX, f32::min);
        assert!((max_y - 1.5).abs() < 0.0001);
        assert!((min_y + 1.5).abs() < 0.0001);

        let widest = mesh
            .vertices
            .iter()
            .filter(|v| v.position.y < 0.0)
            .map(|v| (v.position.x.powi(2) + v.position.z.powi(2)).sqrt())
            .fold(0.0f32, f32::max);
        assert!((widest - 0.07).abs() < 0.0001);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = uv_sphere(0.2, 32, 32);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        for v in &mesh.vertices {
            assert!((v.position.length() - 0.2).abs() < 0.0001);
        }
        assert!((mesh.bounds_radius - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_sphere_triangle_count() {
        let mesh = uv_sphere(0.03, 8, 8);
        // first and last stacks contribute one triangle per slice
        assert_eq!(mesh.triangle_count(), 8 * (8 * 2 - 2));
    }
}
