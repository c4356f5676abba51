use std::f32::consts::FRAC_PI_2;

use crate::math::{signed_area, Shape2D, Vec2, Vec3};
use super::mesh::{triangulate, Mesh, Vertex};

/// Parameters for sweeping a 2D outline along +Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    /// Straight sections between the two bevels
    pub steps: usize,
    /// Length of the straight part
    pub depth: f32,
    pub bevel_enabled: bool,
    /// How far the bevel extends beyond the straight part along Z
    pub bevel_thickness: f32,
    /// How far the bevel grows the outline outward
    pub bevel_size: f32,
    pub bevel_segments: usize,
    /// Samples per Bezier segment of the outline
    pub curve_divisions: usize,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            steps: 1,
            depth: 0.05,
            bevel_enabled: true,
            bevel_thickness: 0.02,
            bevel_size: 0.02,
            bevel_segments: 3,
            curve_divisions: 12,
        }
    }
}

impl ExtrudeSettings {
    /// Number of outline copies stacked along Z
    pub fn layer_count(&self) -> usize {
        2 * self.effective_bevel_segments() + self.steps.max(1) + 1
    }

    fn effective_bevel_segments(&self) -> usize {
        if self.bevel_enabled {
            self.bevel_segments
        } else {
            0
        }
    }

    /// (z, outward offset, normal Z weight) for each layer, front to back
    fn layers(&self) -> Vec<(f32, f32, f32)> {
        let bevel_segments = self.effective_bevel_segments();
        let steps = self.steps.max(1);
        let size = if self.bevel_enabled { self.bevel_size } else { 0.0 };
        let mut layers = Vec::with_capacity(self.layer_count());

        for b in 0..bevel_segments {
            let t = b as f32 / bevel_segments as f32;
            let angle = t * FRAC_PI_2;
            layers.push((
                -self.bevel_thickness * angle.cos(),
                self.bevel_size * angle.sin(),
                -angle.cos(),
            ));
        }

        for s in 0..=steps {
            layers.push((self.depth * s as f32 / steps as f32, size, 0.0));
        }

        for b in (0..bevel_segments).rev() {
            let t = b as f32 / bevel_segments as f32;
            let angle = t * FRAC_PI_2;
            layers.push((
                self.depth + self.bevel_thickness * angle.cos(),
                self.bevel_size * angle.sin(),
                angle.cos(),
            ));
        }

        layers
    }
}

/// Extrude a closed outline into a capped, beveled solid
pub fn extrude_shape(shape: &Shape2D, settings: &ExtrudeSettings) -> Mesh {
    let mut outline = shape.sample(settings.curve_divisions);
    if signed_area(&outline) < 0.0 {
        outline.reverse();
    }
    let n = outline.len();

    let mut mesh = Mesh::new();
    if n < 3 {
        return mesh;
    }

    let edge_normals: Vec<Vec2> = (0..n)
        .map(|i| outward_normal(outline[i], outline[(i + 1) % n]))
        .collect();
    let bevel_dirs: Vec<Vec2> = (0..n)
        .map(|i| bevel_direction(edge_normals[(i + n - 1) % n], edge_normals[i]))
        .collect();

    // Side walls
    let layers = settings.layers();
    let last_layer = (layers.len() - 1).max(1) as f32;
    let mut layer_starts = Vec::with_capacity(layers.len());

    for (index, &(z, offset, normal_z)) in layers.iter().enumerate() {
        let radial = (1.0 - normal_z * normal_z).max(0.0).sqrt();
        let ring = (0..n).map(|i| {
            let dir = bevel_dirs[i];
            let p = outline[i] + dir.scale(offset);
            let normal = Vec3::new(dir.x * radial, dir.y * radial, normal_z).normalize();
            Vertex::new(Vec3::new(p.x, p.y, z), normal)
                .with_uv(i as f32 / n as f32, index as f32 / last_layer)
        });
        layer_starts.push(mesh.add_vertices(ring));
    }

    for pair in layer_starts.windows(2) {
        let (front, back) = (pair[0], pair[1]);
        for i in 0..n as u32 {
            let next = (i + 1) % n as u32;
            mesh.add_quad(front + i, front + next, back + next, back + i);
        }
    }

    // Caps use the un-offset outline at the outermost layers
    let triangles = triangulate(&outline);
    let (front_z, back_z) = (layers[0].0, layers[layers.len() - 1].0);

    let front = mesh.add_vertices(outline.iter().map(|p| {
        Vertex::new(Vec3::new(p.x, p.y, front_z), -Vec3::FORWARD).with_uv(p.x, p.y)
    }));
    for t in &triangles {
        mesh.add_triangle(front + t[0], front + t[2], front + t[1]);
    }

    let back = mesh.add_vertices(outline.iter().map(|p| {
        Vertex::new(Vec3::new(p.x, p.y, back_z), Vec3::FORWARD).with_uv(p.x, p.y)
    }));
    for t in &triangles {
        mesh.add_triangle(back + t[0], back + t[1], back + t[2]);
    }

    mesh.calculate_bounds();
    mesh
}

/// Outward normal of a counter-clockwise edge
fn outward_normal(a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    Vec2::new(edge.y, -edge.x).normalize()
}

/// Miter direction at a corner, lengthened so both adjacent edges move by one unit
fn bevel_direction(prev: Vec2, next: Vec2) -> Vec2 {
    let sum = (prev + next).normalize();
    let cos_half = sum.dot(&next).max(0.5);
    sum.scale(1.0 / cos_half)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape2D {
        // Straight "curves" so sampling is easy to reason about
        Shape2D::new()
            .move_to(0.0, 0.0)
            .bezier_curve_to(0.0, 0.0, 1.0, 0.0, 1.0, 0.0)
            .bezier_curve_to(1.0, 0.0, 1.0, 1.0, 1.0, 1.0)
            .bezier_curve_to(1.0, 1.0, 0.0, 1.0, 0.0, 1.0)
            .bezier_curve_to(0.0, 1.0, 0.0, 0.0, 0.0, 0.0)
    }

    #[test]
    fn test_layer_count() {
        let settings = ExtrudeSettings::default();
        assert_eq!(settings.layer_count(), 8);
        assert_eq!(settings.layers().len(), 8);

        let flat = ExtrudeSettings {
            bevel_enabled: false,
            ..Default::default()
        };
        assert_eq!(flat.layer_count(), 2);
    }

    #[test]
    fn test_layers_span_bevel_and_depth() {
        let settings = ExtrudeSettings::default();
        let layers = settings.layers();

        let (first_z, first_offset, _) = layers[0];
        let (last_z, last_offset, _) = layers[layers.len() - 1];
        assert!((first_z + 0.02).abs() < 0.0001);
        assert!((last_z - 0.07).abs() < 0.0001);
        assert_eq!(first_offset, 0.0);
        assert_eq!(last_offset, 0.0);

        // Straight part sits at full bevel size
        let (z, offset, normal_z) = layers[3];
        assert_eq!(z, 0.0);
        assert!((offset - 0.02).abs() < 0.0001);
        assert_eq!(normal_z, 0.0);
    }

    #[test]
    fn test_extruded_square_topology() {
        let settings = ExtrudeSettings {
            curve_divisions: 1,
            ..Default::default()
        };
        let mesh = extrude_shape(&square(), &settings);

        let n = 4;
        let layers = settings.layer_count();
        assert_eq!(mesh.vertex_count(), layers * n + 2 * n);
        assert_eq!(mesh.triangle_count(), (layers - 1) * n * 2 + 2 * (n - 2));
    }

    #[test]
    fn test_bevel_grows_outline() {
        let settings = ExtrudeSettings {
            curve_divisions: 1,
            ..Default::default()
        };
        let mesh = extrude_shape(&square(), &settings);

        let max_x = mesh.vertices.iter().map(|v| v.position.x).fold(f32::MIN, f32::max);
        assert!((max_x - 1.02).abs() < 0.0001);

        let min_z = mesh.vertices.iter().map(|v| v.position.z).fold(f32::MAX, f32::min);
        assert!((min_z + 0.02).abs() < 0.0001);
    }

    #[test]
    fn test_cap_normals_face_away() {
        let settings = ExtrudeSettings {
            curve_divisions: 1,
            ..Default::default()
        };
        let mesh = extrude_shape(&square(), &settings);

        // Geometric normal of the last (back cap) triangle matches +Z
        let tri = &mesh.indices[mesh.indices.len() - 3..];
        let a = mesh.vertices[tri[0] as usize].position;
        let b = mesh.vertices[tri[1] as usize].position;
        let c = mesh.vertices[tri[2] as usize].position;
        assert!((b - a).cross(&(c - a)).z > 0.0);
    }

    #[test]
    fn test_side_normals_are_unit() {
        let mesh = extrude_shape(&square(), &ExtrudeSettings::default());
        for v in &mesh.vertices {
            assert!((v.normal.length() - 1.0).abs() < 0.001);
        }
    }
}
