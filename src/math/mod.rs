pub mod vec3;
pub mod matrix;
pub mod bezier;
pub mod transform;

pub use vec3::Vec3;
pub use matrix::Mat4;
pub use bezier::{CubicSegment, Shape2D, Vec2, cubic_bezier, signed_area};
pub use transform::Transform;
