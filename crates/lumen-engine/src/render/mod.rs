//! GPU rendering building blocks.
//!
//! - [`ShaderLoader`] / [`ShaderProgram`]: WGSL programs with staged uniforms
//! - [`Framebuffer`]: offscreen color + depth target
//! - [`PixelReadback`]: GPU to CPU pixel copies and PNG screenshots
//! - [`models`]: vertex layout and primitive models
//!
//! Geometry is in homogeneous clip-space conventions (right-handed, depth 0..1).

mod ctx;
mod error;
pub mod models;
mod readback;
mod shader;
mod target;
mod uniform;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::{ReadbackError, ShaderError};
pub use readback::{padded_bytes_per_row, PixelReadback};
pub use shader::{ProgramDesc, ProgramId, ShaderLoader, ShaderProgram, UniformSlot};
pub use target::{Framebuffer, DEPTH_FORMAT};
pub use uniform::{UniformBlock, UniformKind, UniformLayout};
