//! Procedural flower geometry
//!
//! Petal and leaf meshes are 2D Bezier outlines extruded with a bevel; stem,
//! center and sparkles are simple primitives. Everything here is a pure
//! function of fixed parameters.

pub mod mesh;
pub mod extrude;
pub mod profiles;
pub mod primitives;
pub mod placement;

pub use mesh::{Mesh, Vertex, VERTEX_STRIDE};
pub use extrude::{ExtrudeSettings, extrude_shape};
pub use profiles::{build_leaf_profile, build_petal_profile, leaf_mesh, petal_mesh};
pub use primitives::{cylinder, uv_sphere};
pub use placement::{
    PETALS_PER_LAYER, PETAL_LAYERS, place_leaf_pair, place_leaves, place_petal, place_petals, total_petals,
};
