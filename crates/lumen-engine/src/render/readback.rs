//! Copies rendered pixels to the CPU and writes PNG screenshots.

use std::path::Path;
use std::sync::mpsc;

use image::RgbaImage;

use super::error::ReadbackError;

/// `bytes_per_row` alignment required for texture-to-buffer copies.
pub const COPY_ROW_ALIGN: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch of a `width`-pixel RGBA8 row in a copy buffer.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    (width * BYTES_PER_PIXEL).div_ceil(COPY_ROW_ALIGN) * COPY_ROW_ALIGN
}

/// Drops the per-row padding of a copy buffer.
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_row: u32) -> Vec<u8> {
    let row = (width * BYTES_PER_PIXEL) as usize;
    let mut out = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded_row as usize).take(height as usize) {
        out.extend_from_slice(&chunk[..row]);
    }
    out
}

/// Swaps the red and blue channel of every pixel in place.
pub fn swizzle_bgra_to_rgba(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

/// Channel order of an 8-bit, 4-channel format, `None` for anything else.
fn channel_order(format: wgpu::TextureFormat) -> Option<ChannelOrder> {
    use wgpu::TextureFormat as F;
    match format {
        F::Rgba8Unorm | F::Rgba8UnormSrgb => Some(ChannelOrder::Rgba),
        F::Bgra8Unorm | F::Bgra8UnormSrgb => Some(ChannelOrder::Bgra),
        _ => None,
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ChannelOrder {
    Rgba,
    Bgra,
}

/// Render-target-sized capture texture plus a mappable buffer.
///
/// Usage per screenshot: draw the final pass into [`capture_view`](Self::capture_view),
/// call [`encode_copy`](Self::encode_copy) on the same encoder, submit, then
/// [`read`](Self::read) or [`make_screenshot_png`](Self::make_screenshot_png).
pub struct PixelReadback {
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    order: ChannelOrder,
    padded_row: u32,

    capture: wgpu::Texture,
    capture_view: wgpu::TextureView,
    buffer: wgpu::Buffer,
}

impl PixelReadback {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self, ReadbackError> {
        let order = channel_order(format).ok_or(ReadbackError::UnsupportedFormat(format))?;
        let (width, height) = (width.max(1), height.max(1));
        let padded_row = padded_bytes_per_row(width);

        let capture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen readback capture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen readback buffer"),
            size: padded_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            width,
            height,
            format,
            order,
            padded_row,
            capture_view: capture.create_view(&wgpu::TextureViewDescriptor::default()),
            capture,
            buffer,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn capture_view(&self) -> &wgpu::TextureView {
        &self.capture_view
    }

    /// Records a copy of the capture texture into the readback buffer.
    pub fn encode_copy(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.capture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Maps the buffer (blocking on the device) and returns top-down RGBA pixels.
    ///
    /// Only valid after the encoder holding [`encode_copy`](Self::encode_copy)
    /// was submitted.
    pub fn read(&self, device: &wgpu::Device) -> Result<RgbaImage, ReadbackError> {
        let slice = self.buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device.poll(wgpu::PollType::wait_indefinitely())?;
        rx.recv().map_err(|_| ReadbackError::MapCallbackDropped)??;

        let mut pixels = {
            let mapped = slice.get_mapped_range();
            unpad_rows(&mapped, self.width, self.height, self.padded_row)
        };
        self.buffer.unmap();

        if self.order == ChannelOrder::Bgra {
            swizzle_bgra_to_rgba(&mut pixels);
        }

        let rows = pixels.len() as u32 / (self.width * BYTES_PER_PIXEL);
        RgbaImage::from_raw(self.width, self.height, pixels).ok_or(ReadbackError::SizeMismatch {
            expected: (self.width, self.height),
            found: (self.width, rows),
        })
    }

    /// Reads the captured frame and writes it to `path` as PNG.
    pub fn make_screenshot_png(
        &self,
        device: &wgpu::Device,
        path: impl AsRef<Path>,
    ) -> Result<(), ReadbackError> {
        let frame = self.read(device)?;
        frame.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        log::info!("screenshot written to {}", path.as_ref().display());
        Ok(())
    }

    /// Releases the GPU resources now.
    pub fn delete(self) {
        self.capture.destroy();
        self.buffer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(800), 3328);
    }

    #[test]
    fn unpadding_keeps_only_pixel_bytes() {
        let (width, height) = (2, 3);
        let padded = padded_bytes_per_row(width);
        let mut data = vec![0xEE; (padded * height) as usize];
        for y in 0..height as usize {
            for b in 0..8 {
                data[y * padded as usize + b] = (y * 10 + b) as u8;
            }
        }

        let out = unpad_rows(&data, width, height, padded);
        assert_eq!(out.len(), 24);
        assert_eq!(&out[8..16], &[10, 11, 12, 13, 14, 15, 16, 17]);
        assert!(!out.contains(&0xEE));
    }

    #[test]
    fn bgra_is_swizzled_per_pixel() {
        let mut px = [1, 2, 3, 4, 10, 20, 30, 40];
        swizzle_bgra_to_rgba(&mut px);
        assert_eq!(px, [3, 2, 1, 4, 30, 20, 10, 40]);
    }

    #[test]
    fn only_8bit_rgba_formats_are_readable() {
        assert_eq!(channel_order(wgpu::TextureFormat::Bgra8UnormSrgb), Some(ChannelOrder::Bgra));
        assert_eq!(channel_order(wgpu::TextureFormat::Rgba8Unorm), Some(ChannelOrder::Rgba));
        assert_eq!(channel_order(wgpu::TextureFormat::Rgba16Float), None);
    }

    #[test]
    fn screenshot_png_round_trips_through_image() {
        let mut pixels = vec![0u8, 0, 255, 255, 255, 0, 0, 255];
        swizzle_bgra_to_rgba(&mut pixels);
        let img = RgbaImage::from_raw(2, 1, pixels).unwrap();

        let path = std::env::temp_dir().join(format!("lumen-readback-{}.png", std::process::id()));
        img.save_with_format(&path, image::ImageFormat::Png).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(back.get_pixel(1, 0).0, [0, 0, 255, 255]);
    }
}
