use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{
    App, AppControl, FrameCtx, GpuCtx, Lifecycle, LifecycleError, LifecycleEvent, WindowCtx,
};
use crate::device::{Gpu, GpuInit};
use crate::input::translate::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Title and initial logical size of the single window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
        }
    }
}

/// Requests an application can make of the runtime from inside `display`.
///
/// Requests are applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit_requested: bool,
}

impl RuntimeCtx {
    /// Ends the loop after this frame; `dispose` still runs.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

/// Owns the event loop for the lifetime of one application.
pub struct Runtime;

impl Runtime {
    /// Opens the window, drives `app` through its lifecycle, and returns when
    /// the window closes.
    ///
    /// An error from `App::init` ends the loop and is returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("cannot create event loop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("event loop failed")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    lifecycle: Lifecycle,
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    /// Runs a non-frame lifecycle callback with a `GpuCtx`.
    ///
    /// The state only advances once `callback` has returned `Ok`.
    fn lifecycle_call<F>(&mut self, event: LifecycleEvent, callback: F) -> Result<()>
    where
        F: FnOnce(&mut GpuCtx<'_, '_>) -> Result<()>,
    {
        self.with_mut(|fields| {
            let next = fields.lifecycle.next(event)?;
            let mut ctx = GpuCtx {
                window: WindowCtx { id: fields.window.id(), window: fields.window },
                gpu: fields.gpu,
            };
            callback(&mut ctx)?;
            *fields.lifecycle = next;
            Ok(())
        })
    }
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("cannot open window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            lifecycle: Lifecycle::Uninitialized,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w: &Window| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        let init = entry.lifecycle_call(LifecycleEvent::Init, |ctx| app.init(ctx));

        // Keep the entry even on failure so the window and GPU drop together.
        self.window = Some(entry);
        init.context("application init failed")?;

        log::info!("window initialized");
        Ok(())
    }

    /// Records a fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.shutdown(event_loop);
    }

    /// Disposes the application (if live), drops the window and exits the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;

        if let Some(mut entry) = self.window.take() {
            if entry.borrow_lifecycle().is_live() {
                let app = &mut self.app;
                let disposed = entry.lifecycle_call(LifecycleEvent::Dispose, |ctx| {
                    app.dispose(ctx);
                    Ok(())
                });
                if let Err(e) = disposed {
                    log::error!("dispose failed: {e:#}");
                }
            }
        }

        event_loop.exit();
    }

    fn reshape(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };

        entry.with_gpu_mut(|gpu| gpu.resize(new_size));

        if new_size.width == 0 || new_size.height == 0 || !entry.borrow_lifecycle().is_live() {
            return;
        }

        let app = &mut self.app;
        let reshaped = entry.lifecycle_call(LifecycleEvent::Reshape, |ctx| {
            app.reshape(ctx, new_size.width, new_size.height);
            Ok(())
        });
        if let Err(e) = reshaped {
            log::warn!("reshape skipped: {e:#}");
        }

        entry.with_window(|w| w.request_redraw());
    }

    /// Drives one `display` call. Returns whether the app asked to exit.
    fn redraw(&mut self) -> bool {
        let Some(entry) = self.window.as_mut() else { return false };
        let app = &mut self.app;
        let mut runtime_ctx = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            let next = match fields.lifecycle.next(LifecycleEvent::Display) {
                Ok(next) => next,
                Err(LifecycleError { state, .. }) => {
                    log::trace!("redraw ignored while {state}");
                    return;
                }
            };

            let time = fields.clock.tick();

            // Scope so `ctx` is dropped before the frame deltas are cleared.
            {
                let mut ctx = FrameCtx {
                    window: WindowCtx { id: fields.window.id(), window: fields.window },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime_ctx,
                };
                control = app.display(&mut ctx);
            }

            *fields.lifecycle = next;
            fields.input_frame.clear();
        });

        control == AppControl::Exit || runtime_ctx.exit_requested()
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.open_window(event_loop) {
            self.fail(event_loop, e);
            return;
        }

        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the animation runs at the present rate.
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let app = &mut self.app;
        let Some(entry) = self.window.as_mut() else { return };
        if entry.borrow_window().id() != window_id {
            return;
        }

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window.scale_factor(), &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        if app.on_window_event(window_id, &event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => self.reshape(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                self.reshape(new_size);
            }

            WindowEvent::RedrawRequested => {
                if self.redraw() {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.shutdown(event_loop);
        }
    }
}
