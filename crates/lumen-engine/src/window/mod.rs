//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single application window, creates the
//! GPU context for it and drives the [`App`](crate::core::App) lifecycle.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
