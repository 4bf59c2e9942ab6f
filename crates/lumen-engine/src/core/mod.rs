//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and the application: the lifecycle callbacks, the state machine that orders
//! them, and the contexts handed to each callback.

mod app;
mod ctx;
mod lifecycle;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, GpuCtx, WindowCtx};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleEvent};
