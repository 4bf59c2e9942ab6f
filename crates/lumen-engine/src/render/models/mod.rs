//! Primitive models drawn with a [`ShaderProgram`](super::ShaderProgram).

mod axis;
mod mesh;
mod quad;

pub use axis::{Axis, MAX_TICKS};
pub use mesh::{Mesh, Model, Vertex};
pub use quad::Quad;
