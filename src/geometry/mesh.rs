use crate::math::{Vec2, Vec3};

/// A vertex with position, normal and UV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: [f32; 2],
}

/// Floats per vertex in the GPU buffer
pub const VERTEX_STRIDE: usize = 8;

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            uv: [0.0, 0.0],
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = [u, v];
        self
    }

    /// Convert to flat array for WebGL buffer
    /// Layout: position(3) + normal(3) + uv(2) = 8 floats
    pub fn to_array(&self) -> [f32; VERTEX_STRIDE] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
            self.uv[0], self.uv[1],
        ]
    }
}

/// A mesh composed of vertices and triangle indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Bounding sphere, used to fit the shadow camera
    pub bounds_center: Vec3,
    pub bounds_radius: f32,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Add a quad as two triangles (CCW winding)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Calculate bounding sphere around the vertex centroid
    pub fn calculate_bounds(&mut self) {
        if self.vertices.is_empty() {
            self.bounds_center = Vec3::ZERO;
            self.bounds_radius = 0.0;
            return;
        }

        let mut center = Vec3::ZERO;
        for v in &self.vertices {
            center += v.position;
        }
        center = center.scale(1.0 / self.vertices.len() as f32);

        self.bounds_radius = self
            .vertices
            .iter()
            .map(|v| v.position.distance(&center))
            .fold(0.0f32, f32::max);
        self.bounds_center = center;
    }

    /// Get vertex buffer data as flat f32 array
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Triangulate a simple counter-clockwise polygon by ear clipping.
///
/// Returns index triples into `points`, each wound counter-clockwise.
pub fn triangulate(points: &[Vec2]) -> Vec<[u32; 3]> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let a = points[remaining[(i + n - 1) % n]];
            let b = points[remaining[i]];
            let c = points[remaining[(i + 1) % n]];
            if (b - a).cross(&(c - b)) <= 0.0 {
                return false;
            }
            !remaining
                .iter()
                .filter(|&&j| j != remaining[(i + n - 1) % n] && j != remaining[i] && j != remaining[(i + 1) % n])
                .any(|&j| point_in_triangle(points[j], a, b, c))
        });

        // Degenerate outline: close the rest as a fan
        let Some(i) = ear else {
            for k in 1..remaining.len() - 1 {
                triangles.push([remaining[0] as u32, remaining[k] as u32, remaining[k + 1] as u32]);
            }
            return triangles;
        };

        triangles.push([
            remaining[(i + n - 1) % n] as u32,
            remaining[i] as u32,
            remaining[(i + 1) % n] as u32,
        ]);
        remaining.remove(i);
    }

    if remaining.len() == 3 {
        triangles.push([remaining[0] as u32, remaining[1] as u32, remaining[2] as u32]);
    }

    triangles
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).cross(&(p - a));
    let d2 = (c - b).cross(&(p - b));
    let d3 = (a - c).cross(&(p - c));
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}
