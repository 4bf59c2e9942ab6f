use anyhow::{Context, Result, anyhow};
use glam::Mat4;

use lumen_engine::core::{App, AppControl, FrameCtx, GpuCtx};
use lumen_engine::input::Key;
use lumen_engine::math::{matrix, VecF3, VecF4};
use lumen_engine::render::models::{Axis, Model, Quad};
use lumen_engine::render::{
    Framebuffer, PixelReadback, ProgramDesc, ProgramId, RenderCtx, RenderTarget, ShaderLoader,
    UniformKind, DEPTH_FORMAT,
};

use crate::input::{CameraInput, OrbitInput};
use crate::settings::ExampleSettings;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::TRANSPARENT;

/// Texture unit the axes framebuffer is sampled through.
const AXES_TEXTURE_UNIT: u32 = 0;

const AXES_UNIFORMS: &[(&str, UniformKind)] = &[
    ("PMatrix", UniformKind::Mat4),
    ("MVMatrix", UniformKind::Mat4),
    ("Color", UniformKind::Vec4),
];

const POSTPROCESS_UNIFORMS: &[(&str, UniformKind)] = &[
    ("MVMatrix", UniformKind::Mat4),
    ("PMatrix", UniformKind::Mat4),
    ("scrWidth", UniformKind::Int),
    ("scrHeight", UniformKind::Int),
];

const RED: VecF4 = VecF4::new(1.0, 0.0, 0.0, 1.0);
const GREEN: VecF4 = VecF4::new(0.0, 1.0, 0.0, 1.0);
const BLUE: VecF4 = VecF4::new(0.0, 0.0, 1.0, 1.0);

/// Renders three colored axes into an offscreen framebuffer, then composites
/// that framebuffer to the screen through a post-process program.
pub struct ExampleListener {
    settings: ExampleSettings,
    orbit: OrbitInput,
    loader: ShaderLoader,

    axes_program: Option<ProgramId>,
    postprocess_program: Option<ProgramId>,

    x_axis: Axis,
    y_axis: Axis,
    z_axis: Axis,
    fsq_postprocess: Quad,

    axes_fbo: Option<Framebuffer>,
    final_pbo: Option<PixelReadback>,

    canvas_width: u32,
    canvas_height: u32,
    aspect: f32,

    eye: VecF4,
    at: VecF4,
    up: VecF4,
}

impl ExampleListener {
    pub fn new(settings: ExampleSettings) -> Self {
        let axis = |from: VecF3, to: VecF3| Axis::new(from, to, 0.1, 0.02);

        Self {
            orbit: OrbitInput::new(&settings),
            loader: ShaderLoader::new(settings.shader_dir.clone()),
            eye: settings.eye(),
            at: VecF4::point(0.0, 0.0, 0.0),
            up: VecF4::new(0.0, 1.0, 0.0, 0.0),
            settings,

            axes_program: None,
            postprocess_program: None,

            x_axis: axis(VecF3::new(-1.0, 0.0, 0.0), VecF3::new(1.0, 0.0, 0.0)),
            y_axis: axis(VecF3::new(0.0, -1.0, 0.0), VecF3::new(0.0, 1.0, 0.0)),
            z_axis: axis(VecF3::new(0.0, 0.0, -1.0), VecF3::new(0.0, 0.0, 1.0)),
            fsq_postprocess: Quad::new(2.0, 2.0, VecF3::new(0.0, 0.0, 0.1)),

            axes_fbo: None,
            final_pbo: None,

            canvas_width: 0,
            canvas_height: 0,
            aspect: 1.0,
        }
    }

    fn set_canvas(&mut self, width: u32, height: u32) {
        self.canvas_width = width;
        self.canvas_height = height;
        self.aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };
    }

    /// (Re)creates the size-dependent targets and rebinds the axes texture.
    fn create_targets(&mut self, ctx: &GpuCtx<'_, '_>) -> Result<()> {
        if let Some(fbo) = self.axes_fbo.take() {
            fbo.delete();
        }
        if let Some(pbo) = self.final_pbo.take() {
            pbo.delete();
        }

        let (w, h) = (self.canvas_width, self.canvas_height);
        let format = ctx.surface_format();

        let fbo = Framebuffer::new(ctx.device(), w, h, format, AXES_TEXTURE_UNIT);

        if let Some(program) = self.postprocess_program.and_then(|id| self.loader.program_mut(id)) {
            program
                .bind_textures(ctx.device(), &[(fbo.texture_unit(), fbo.view())])
                .context("binding the axes texture")?;
        }
        self.axes_fbo = Some(fbo);

        // Screenshots are optional; a surface format we cannot read back only disables them.
        self.final_pbo = match PixelReadback::new(ctx.device(), w, h, format) {
            Ok(pbo) => Some(pbo),
            Err(e) => {
                log::warn!("screenshots disabled: {e}");
                None
            }
        };

        Ok(())
    }

    fn model_view(&self, camera: &CameraInput) -> Mat4 {
        let rotation = camera.rotation;
        matrix::look_at(self.eye, self.at, self.up)
            * matrix::translate(VecF3::new(0.0, 0.0, camera.view_dist))
            * matrix::rotation_x(rotation[0])
            * matrix::rotation_y(rotation[1])
            * matrix::rotation_z(rotation[2])
    }

    fn perspective(&self) -> Mat4 {
        matrix::perspective(self.settings.fovy, self.aspect, self.settings.z_near, self.settings.z_far)
    }

    fn render_scene(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mv: Mat4) {
        if let Err(e) = self.render_axes(rctx, target, mv) {
            log::error!("axes not rendered: {e:#}");
        }
    }

    fn render_axes(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mv: Mat4) -> Result<()> {
        let perspective = self.perspective();

        let fbo = self.axes_fbo.as_ref().ok_or_else(|| anyhow!("axes framebuffer missing"))?;
        let program = self
            .axes_program
            .and_then(|id| self.loader.program_mut(id))
            .ok_or_else(|| anyhow!("program `axes` is not initialized"))?;

        program.set_uniform_matrix("PMatrix", perspective)?;
        program.set_uniform_matrix("MVMatrix", mv)?;

        let mut pass = fbo.bind(target.encoder, CLEAR_COLOR);

        for (axis, color) in [(&self.x_axis, RED), (&self.y_axis, GREEN), (&self.z_axis, BLUE)] {
            program.set_uniform_vector("Color", color)?;
            let slot = program.use_program(rctx.queue)?;
            axis.draw(&mut pass, program, slot)?;
        }

        Ok(())
    }

    fn render_textures_to_screen(
        &mut self,
        rctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        capture: bool,
    ) -> Result<bool> {
        let program = self
            .postprocess_program
            .and_then(|id| self.loader.program_mut(id))
            .ok_or_else(|| anyhow!("program `postprocess` is not initialized"))?;

        // Point-blank: the quad already spans clip space.
        program.set_uniform_matrix("MVMatrix", matrix::identity())?;
        program.set_uniform_matrix("PMatrix", matrix::identity())?;
        program.set_uniform_int("scrWidth", self.canvas_width as i32)?;
        program.set_uniform_int("scrHeight", self.canvas_height as i32)?;

        {
            let slot = program.use_program(rctx.queue)?;
            let mut pass = target.begin_pass(None, CLEAR_COLOR);
            self.fsq_postprocess.draw(&mut pass, program, slot)?;
        }

        if let (true, Some(pbo)) = (capture, self.final_pbo.as_ref()) {
            {
                let slot = program.use_program(rctx.queue)?;
                let mut pass = target.begin_pass(Some(pbo.capture_view()), CLEAR_COLOR);
                self.fsq_postprocess.draw(&mut pass, program, slot)?;
            }
            pbo.encode_copy(target.encoder);
            return Ok(true);
        }

        Ok(false)
    }
}

/// What to do about a screenshot request once the frame was submitted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ScreenshotStep {
    /// Nothing was requested.
    Idle,
    /// The capture was copied this frame; write it and clear the request.
    Write,
    /// Nothing was copied (frame skipped or the pass failed); keep the request.
    Retry,
    /// No readback exists for this surface format; drop the request.
    Unavailable,
}

fn screenshot_step(requested: bool, readback_available: bool, captured: bool) -> ScreenshotStep {
    match (requested, readback_available, captured) {
        (false, ..) => ScreenshotStep::Idle,
        (true, false, _) => ScreenshotStep::Unavailable,
        (true, true, true) => ScreenshotStep::Write,
        (true, true, false) => ScreenshotStep::Retry,
    }
}

impl App for ExampleListener {
    fn init(&mut self, ctx: &mut GpuCtx<'_, '_>) -> Result<()> {
        let (w, h) = ctx.size();
        self.set_canvas(w, h);

        let format = ctx.surface_format();
        log::debug!("loading shaders from {}", self.loader.shader_dir().display());

        let axes_desc = ProgramDesc {
            depth_format: Some(DEPTH_FORMAT),
            topology: wgpu::PrimitiveTopology::LineList,
            ..ProgramDesc::new(AXES_UNIFORMS, format)
        };
        let postprocess_desc = ProgramDesc {
            texture_units: 1,
            ..ProgramDesc::new(POSTPROCESS_UNIFORMS, format)
        };

        let axes = self
            .loader
            .create_program(ctx.device(), "axes", "vs_axes.wgsl", "fs_axes.wgsl", &axes_desc)
            .context("loading the axes program")?;
        let postprocess = self
            .loader
            .create_program(
                ctx.device(),
                "postprocess",
                "vs_postprocess.wgsl",
                "fs_postprocess.wgsl",
                &postprocess_desc,
            )
            .context("loading the postprocess program")?;
        self.axes_program = Some(axes);
        self.postprocess_program = Some(postprocess);

        self.x_axis.init(ctx.device());
        self.y_axis.init(ctx.device());
        self.z_axis.init(ctx.device());
        self.fsq_postprocess.init(ctx.device());

        self.create_targets(ctx)?;

        log::info!("example initialized at {w}x{h} (aspect {:.3})", self.aspect);
        Ok(())
    }

    fn display(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let camera = self.orbit.update(ctx.input, ctx.input_frame);
        let mv = self.model_view(&camera);
        let capture = camera.screenshot_requested && self.final_pbo.is_some();

        self.loader.begin_frame();

        let mut captured = false;
        let control = ctx.render(|rctx, target| {
            self.render_scene(rctx, target, mv);
            match self.render_textures_to_screen(rctx, target, capture) {
                Ok(copied) => captured = copied,
                Err(e) => log::error!("post-process not rendered: {e:#}"),
            }
        });

        match screenshot_step(camera.screenshot_requested, self.final_pbo.is_some(), captured) {
            ScreenshotStep::Idle => {}
            ScreenshotStep::Write => {
                if let Some(pbo) = self.final_pbo.as_ref() {
                    if let Err(e) = pbo.make_screenshot_png(ctx.gpu.device(), &self.settings.screenshot_path) {
                        log::error!("screenshot failed: {e}");
                    }
                }
                self.orbit.clear_screenshot();
            }
            ScreenshotStep::Retry => log::debug!("screenshot not captured this frame, retrying"),
            ScreenshotStep::Unavailable => {
                log::warn!("screenshot requested but readback is unavailable");
                self.orbit.clear_screenshot();
            }
        }

        control
    }

    fn reshape(&mut self, ctx: &mut GpuCtx<'_, '_>, width: u32, height: u32) {
        self.set_canvas(width, height);
        if let Err(e) = self.create_targets(ctx) {
            log::error!("reshape to {width}x{height} failed: {e:#}");
        }
    }

    fn dispose(&mut self, _ctx: &mut GpuCtx<'_, '_>) {
        if let Some(fbo) = self.axes_fbo.take() {
            fbo.delete();
        }
        if let Some(pbo) = self.final_pbo.take() {
            pbo.delete();
        }

        self.loader.cleanup();
        self.axes_program = None;
        self.postprocess_program = None;

        log::info!("example disposed");
    }
}
