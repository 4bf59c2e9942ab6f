use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The window being drawn, borrowed for one callback.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Context passed to `init`, `reshape` and `dispose`.
///
/// The GPU is current (surface configured) for the duration of the callback.
pub struct GpuCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
}

impl<'a, 'w> GpuCtx<'a, 'w> {
    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    /// Drawable size in physical pixels, as last configured on the surface.
    pub fn size(&self) -> (u32, u32) {
        let s = self.gpu.size();
        (s.width, s.height)
    }
}

/// Per-frame context passed to `core::App::display`.
///
/// Everything borrowed here lives for the call (`'a`); the GPU itself is
/// tied to the window (`'w`).
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    /// Held keys and buttons.
    pub input: &'a InputState,
    /// Edges and motion since the previous frame.
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next surface texture, calls `draw` with a ready
    /// [`RenderCtx`] and [`RenderTarget`], then submits and presents.
    ///
    /// Surface errors are resolved here: transient ones skip the frame, a fatal
    /// one returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("failed to acquire surface texture: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action.is_fatal() {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let size = self.gpu.size();
        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            (size.width, size.height),
        );

        // The target must be gone before `submit` consumes the frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
