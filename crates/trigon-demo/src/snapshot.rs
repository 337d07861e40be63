use std::path::Path;

use anyhow::{Context, Result};

use trigon_engine::device::{GpuInit, HeadlessGpu};
use trigon_engine::paint::Color;
use trigon_engine::render::offscreen::{self, OffscreenTarget};
use trigon_engine::render::{RenderCtx, RenderTarget, TriangleRenderer, TriangleSource};

/// Renders a single frame offscreen and writes it to `path` as PNG.
pub fn write_png(
    path: &Path,
    source: TriangleSource,
    clear: Color,
    (width, height): (u32, u32),
    gpu_init: GpuInit,
) -> Result<()> {
    let gpu = pollster::block_on(HeadlessGpu::new(gpu_init))?;
    let target = OffscreenTarget::new(gpu.device(), width, height, wgpu::TextureFormat::Rgba8UnormSrgb)?;

    let mut renderer = TriangleRenderer::new(source);
    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("trigon snapshot encoder"),
        });

    {
        let rctx = RenderCtx::new(gpu.device(), gpu.queue(), target.format());
        let mut rt = RenderTarget::new(&mut encoder, target.view());
        renderer.render(&rctx, &mut rt, clear);
    }
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let pixels = offscreen::read_rgba8(gpu.device(), gpu.queue(), &target)?;

    image::save_buffer(path, &pixels, width, height, image::ExtendedColorType::Rgba8)
        .with_context(|| format!("failed to write {}", path.display()))?;

    log::info!("wrote {width}x{height} snapshot to {}", path.display());
    Ok(())
}
