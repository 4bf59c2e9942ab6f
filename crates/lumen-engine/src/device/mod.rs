//! GPU device + window surface.
//!
//! [`Gpu`] owns the wgpu device and queue and the configured swapchain
//! surface. Frames are acquired with [`Gpu::begin_frame`] and finished with
//! [`Gpu::submit`].

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
