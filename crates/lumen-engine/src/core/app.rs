use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, GpuCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Host-driven application contract.
///
/// The runtime owns the schedule and guarantees the order
/// `init`, then any mix of `display` / `reshape`, then `dispose` exactly once
/// (see [`Lifecycle`](super::Lifecycle)).
pub trait App {
    /// Called once after the GPU context exists. An error aborts the runtime.
    fn init(&mut self, ctx: &mut GpuCtx<'_, '_>) -> Result<()>;

    /// Called once per rendered frame.
    fn display(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called after the drawable was resized to `width` x `height` physical pixels.
    fn reshape(&mut self, ctx: &mut GpuCtx<'_, '_>, width: u32, height: u32) {
        let _ = (ctx, width, height);
    }

    /// Called once before the GPU context is dropped.
    fn dispose(&mut self, ctx: &mut GpuCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called for raw window events, before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }
}
