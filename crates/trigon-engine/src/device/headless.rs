use anyhow::{Context, Result};

use super::{AdapterSummary, GpuInit};

/// Device and queue without a presentation surface.
///
/// Used for offscreen rendering (snapshots). Surface-related fields of
/// [`GpuInit`] are ignored.
pub struct HeadlessGpu {
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    pub async fn new(init: GpuInit) -> Result<Self> {
        let instance = init.instance();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no WebGPU-compatible adapter found; this platform cannot run the demo")?;

        log::info!("using adapter {} (headless)", AdapterSummary::from(adapter.get_info()));

        let (device, queue) = adapter
            .request_device(&init.device_descriptor("trigon headless device"))
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_summary(&self) -> AdapterSummary {
        AdapterSummary::from(self.adapter.get_info())
    }
}
