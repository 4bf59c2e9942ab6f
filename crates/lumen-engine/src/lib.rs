//! Lumen engine crate.
//!
//! A small wgpu + winit framework for example applications: a host-driven
//! lifecycle (`init` / `display` / `reshape` / `dispose`), shader programs
//! with staged uniforms, offscreen framebuffers, pixel readback and a few
//! primitive models, plus fixed-size vector math.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod math;
pub mod render;
pub mod time;
pub mod window;
