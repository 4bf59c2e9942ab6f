//! Renders coordinate axes offscreen and composites them to the window
//! through a post-process pass.
//!
//! Left-drag rotates, the wheel zooms, `S` or `F12` saves a screenshot,
//! `Escape` quits.

mod input;
mod listener;
mod settings;

use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::listener::ExampleListener;
use crate::settings::ExampleSettings;

fn main() {
    init_logging(LoggingConfig::default());

    let settings = ExampleSettings::from_env();
    log::info!("shaders from {}", settings.shader_dir.display());

    let config = RuntimeConfig {
        title: settings.window_title.clone(),
        initial_size: LogicalSize::new(settings.window_width as f64, settings.window_height as f64),
    };
    let gpu_init = GpuInit::vsync(settings.vsync);

    if let Err(e) = Runtime::run(config, gpu_init, ExampleListener::new(settings)) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
