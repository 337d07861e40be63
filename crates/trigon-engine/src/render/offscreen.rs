//! Offscreen color target and CPU readback.
//!
//! Lets the triangle be rendered without a window, e.g. to write a PNG.

use anyhow::{Context, Result};

/// RGBA8 is the only readback layout supported.
const BYTES_PER_PIXEL: u32 = 4;

/// A texture that can be rendered into and copied out of.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "offscreen target has zero size");
        check_extent(width, height, device.limits().max_texture_dimension_2d)?;
        anyhow::ensure!(
            format.block_copy_size(None) == Some(BYTES_PER_PIXEL),
            "offscreen format {format:?} is not a 4-byte color format"
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            format,
            width,
            height,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Fails if either side is larger than the device's 2D texture limit.
pub fn check_extent(width: u32, height: u32, max: u32) -> Result<()> {
    anyhow::ensure!(
        width <= max && height <= max,
        "snapshot size {width}x{height} exceeds the device limit {max}"
    );
    Ok(())
}

/// Row pitch for a texture-to-buffer copy, rounded up to
/// [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`].
pub fn padded_bytes_per_row(width: u32, bytes_per_pixel: u32) -> u32 {
    let unpadded = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drops the per-row alignment padding from a mapped readback buffer.
pub fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_pixel: u32) -> Vec<u8> {
    let row = (width * bytes_per_pixel) as usize;
    let padded = padded_bytes_per_row(width, bytes_per_pixel) as usize;

    let mut out = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded).take(height as usize) {
        out.extend_from_slice(&chunk[..row.min(chunk.len())]);
    }
    out
}

/// Copies `target` into a staging buffer and returns tightly packed RGBA8 rows.
///
/// Blocks until the GPU has finished all submitted work.
pub fn read_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    target: &OffscreenTarget,
) -> Result<Vec<u8>> {
    let (width, height) = target.size();
    let bytes_per_row = padded_bytes_per_row(width, BYTES_PER_PIXEL);

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("trigon readback staging"),
        size: bytes_per_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("trigon readback encoder"),
    });

    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })
        .context("device poll failed during readback")?;

    rx.recv()
        .context("readback callback dropped")?
        .context("failed to map readback buffer")?;

    let pixels = {
        let data = slice.get_mapped_range();
        strip_row_padding(&data, width, height, BYTES_PER_PIXEL)
    };
    staging.unmap();

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, HeadlessGpu};
    use crate::paint::Color;
    use crate::render::{RenderCtx, RenderTarget, TriangleRenderer, TriangleSource};

    #[test]
    fn extent_within_limit_is_accepted() {
        assert!(check_extent(64, 64, 8192).is_ok());
        assert!(check_extent(8192, 1, 8192).is_ok());
    }

    #[test]
    fn extent_over_limit_names_size_and_limit() {
        let err = check_extent(20000, 16, 8192).unwrap_err();
        assert_eq!(
            err.to_string(),
            "snapshot size 20000x16 exceeds the device limit 8192"
        );
        assert!(check_extent(16, 8193, 8192).is_err());
    }

    const SIZE: u32 = 64;

    fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * SIZE + x) * BYTES_PER_PIXEL) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    fn render_once(gpu: &HeadlessGpu, source: TriangleSource, clear: Color) -> Vec<u8> {
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let target = OffscreenTarget::new(gpu.device(), SIZE, SIZE, format).unwrap();
        let mut renderer = TriangleRenderer::new(source);

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), format);
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            renderer.render(&ctx, &mut rt, clear);
        }
        gpu.queue().submit(std::iter::once(encoder.finish()));

        read_rgba8(gpu.device(), gpu.queue(), &target).unwrap()
    }

    #[test]
    fn renders_both_variants_over_clear() {
        let gpu = match pollster::block_on(HeadlessGpu::new(GpuInit::default())) {
            Ok(gpu) => gpu,
            Err(err) => {
                eprintln!("skipping GPU render test: {err:#}");
                return;
            }
        };

        let clear = [0, 0, 0, 255];
        let center = SIZE / 2;

        let buffered = render_once(&gpu, TriangleSource::default(), Color::BLACK);
        assert_eq!(buffered.len(), (SIZE * SIZE * BYTES_PER_PIXEL) as usize);
        assert_eq!(pixel(&buffered, 0, 0), clear);
        assert_ne!(pixel(&buffered, center, center), clear);

        let builtin = render_once(&gpu, TriangleSource::Builtin, Color::BLACK);
        assert_eq!(pixel(&builtin, 0, 0), clear);
        assert_eq!(pixel(&builtin, SIZE - 1, SIZE - 1), clear);
        assert_eq!(pixel(&builtin, center, center), [255, 0, 0, 255]);
    }

    #[test]
    fn oversized_target_is_rejected_before_allocation() {
        let Ok(gpu) = pollster::block_on(HeadlessGpu::new(GpuInit::default())) else {
            eprintln!("skipping GPU size-limit test: no adapter");
            return;
        };

        let max = gpu.device().limits().max_texture_dimension_2d;
        let err = OffscreenTarget::new(
            gpu.device(),
            max + 1,
            16,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("exceeds the device limit"));
    }

    #[test]
    fn row_pitch_rounds_up_to_alignment() {
        assert_eq!(padded_bytes_per_row(1, 4), 256);
        assert_eq!(padded_bytes_per_row(64, 4), 256);
        assert_eq!(padded_bytes_per_row(65, 4), 512);
        assert_eq!(padded_bytes_per_row(800, 4), 3328);
    }

    #[test]
    fn aligned_rows_are_unchanged() {
        let data: Vec<u8> = (0..=255u8).cycle().take(256 * 2).collect();
        assert_eq!(strip_row_padding(&data, 64, 2, 4), data);
    }

    #[test]
    fn padding_is_removed_per_row() {
        // 2x2 RGBA8: each 8-byte row is padded to 256 bytes.
        let mut data = vec![0xAA; 512];
        data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        data[256..264].copy_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16]);

        let out = strip_row_padding(&data, 2, 2, 4);
        assert_eq!(out, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn short_buffer_yields_what_is_there() {
        let data = vec![7u8; 8];
        assert_eq!(strip_row_padding(&data, 2, 3, 4), vec![7u8; 8]);
    }
}
