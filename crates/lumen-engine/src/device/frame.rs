/// One acquired swapchain image plus the encoder recording into it.
///
/// Finish it with `Gpu::submit`, which presents the image. Until then no
/// further image can be acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
