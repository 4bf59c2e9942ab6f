//! Swapchain surface plus the policy for configuring and recovering it.

use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

const SRGB_FORMATS: [wgpu::TextureFormat; 2] =
    [wgpu::TextureFormat::Bgra8UnormSrgb, wgpu::TextureFormat::Rgba8UnormSrgb];

/// First sRGB 8-bit format the surface offers when `prefer_srgb`, otherwise
/// (or failing that) the surface's own first choice.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = SRGB_FORMATS
        .into_iter()
        .filter(|_| prefer_srgb)
        .find(|f| caps.formats.contains(f));
    srgb.or_else(|| caps.formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if caps.alpha_modes.contains(&mode) => mode,
        _ => caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

/// Maps an acquire failure to what the frame loop should do.
fn classify(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    use wgpu::SurfaceError as E;
    match err {
        E::Lost | E::Outdated => SurfaceErrorAction::Reconfigured,
        E::OutOfMemory => SurfaceErrorAction::Fatal,
        E::Timeout | E::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[inline]
fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// The window surface with its live configuration.
///
/// A zero-sized window (minimized) is recorded but not configured; wgpu
/// rejects 0x0 surfaces.
pub(crate) struct SurfaceState<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceState<'w> {
    pub(crate) fn new(
        surface: wgpu::Surface<'w>,
        config: wgpu::SurfaceConfiguration,
        device: &wgpu::Device,
    ) -> Self {
        let size = PhysicalSize::new(config.width, config.height);
        let state = Self { surface, config, size };
        state.surface.configure(device, &state.config);
        log::debug!(
            "surface configured: {}x{} {:?} {:?}",
            size.width,
            size.height,
            state.config.format,
            state.config.present_mode
        );
        state
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !is_drawable(new_size) {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Reconfigures after a lost/outdated surface and reports the action.
    pub(crate) fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = classify(&err);
        match action {
            SurfaceErrorAction::Reconfigured if is_drawable(self.size) => {
                self.surface.configure(device, &self.config);
            }
            SurfaceErrorAction::Fatal => log::error!("surface unrecoverable: {err}"),
            _ => {}
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: Vec<wgpu::TextureFormat>, alpha: Vec<wgpu::CompositeAlphaMode>) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            alpha_modes: alpha,
            ..Default::default()
        }
    }

    #[test]
    fn srgb_preferred_when_available() {
        let c = caps(
            vec![wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            vec![],
        );
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&caps(vec![], vec![]), true), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let c = caps(vec![], vec![wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&caps(vec![], vec![]), None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn surface_errors_are_classified() {
        assert_eq!(classify(&wgpu::SurfaceError::Outdated), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert!(classify(&wgpu::SurfaceError::OutOfMemory).is_fatal());
    }

    #[test]
    fn minimized_window_is_not_drawable() {
        assert!(!is_drawable(PhysicalSize::new(0, 600)));
        assert!(is_drawable(PhysicalSize::new(1, 1)));
    }
}
