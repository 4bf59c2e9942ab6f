/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Swap behavior. `Fifo` waits for vertical blank (vsync) and is always supported.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference; an unsupported request falls back to a
    /// mode the surface reports.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Defaults with vertical sync switched on or off.
    pub fn vsync(enabled: bool) -> Self {
        Self {
            present_mode: if enabled {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            ..Self::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_selects_present_mode() {
        assert_eq!(GpuInit::vsync(true).present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(GpuInit::vsync(false).present_mode, wgpu::PresentMode::AutoNoVsync);
        assert!(GpuInit::vsync(false).prefer_srgb);
    }
}
