//! WebGL2 backend

pub mod webgl;
pub mod shaders;
pub mod pipeline;

pub use webgl::WebGLContext;
pub use pipeline::{RenderPipeline, RenderSettings};
