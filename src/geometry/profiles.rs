//! Petal and leaf outlines and their extruded meshes

use crate::math::Shape2D;
use super::extrude::{extrude_shape, ExtrudeSettings};
use super::mesh::Mesh;

/// Teardrop petal outline: four cubic segments from the base out to the tip and back
pub fn build_petal_profile() -> Shape2D {
    Shape2D::new()
        .move_to(0.0, 0.0)
        .bezier_curve_to(0.1, 0.2, 0.3, 0.4, 0.5, 0.5)
        .bezier_curve_to(0.7, 0.4, 0.9, 0.2, 1.0, 0.0)
        .bezier_curve_to(0.9, -0.05, 0.7, -0.1, 0.5, -0.1)
        .bezier_curve_to(0.3, -0.1, 0.1, -0.05, 0.0, 0.0)
}

/// Symmetric leaf outline: two cubic segments mirrored across the X axis
pub fn build_leaf_profile() -> Shape2D {
    Shape2D::new()
        .move_to(0.0, 0.0)
        .bezier_curve_to(0.5, 0.5, 1.0, 0.5, 1.5, 0.0)
        .bezier_curve_to(1.0, -0.5, 0.5, -0.5, 0.0, 0.0)
}

pub fn petal_mesh() -> Mesh {
    extrude_shape(&build_petal_profile(), &ExtrudeSettings::default())
}

pub fn leaf_mesh() -> Mesh {
    extrude_shape(&build_leaf_profile(), &ExtrudeSettings::default())
}
