//! Offscreen runs: the kernels without a window
//!
//! Useful for CI captures and for checking a scene renders at all.

use std::path::PathBuf;

use anyhow::{Context, Result};
use compute::{BufferSlot, ComputeBackend, ComputeError, DispatchPlan, WgpuKernels};
use tracing::info;

use crate::context::FrameContext;
use crate::frame::FrameLoop;
use crate::pipeline::load_raymarch_source;
use crate::{screenshot, RendererConfig};

pub struct HeadlessState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    kernels: WgpuKernels,
}

impl HeadlessState {
    pub async fn new(resolution: u32, shape_capacity: usize, shader_source: &str) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let (_adapter, device, queue) = crate::state::request_device(&instance, None).await?;
        let kernels = WgpuKernels::new(&device, resolution, shape_capacity, shader_source)?;
        Ok(Self {
            device,
            queue,
            kernels,
        })
    }
}

impl ComputeBackend for HeadlessState {
    fn write_buffer(&mut self, slot: BufferSlot, bytes: &[u8]) {
        self.kernels.write(&self.queue, slot, bytes);
    }

    fn submit(&mut self, plan: &DispatchPlan) -> Result<(), ComputeError> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("headless frame"),
            });
        self.kernels.encode(&mut encoder, plan);
        self.queue.submit(Some(encoder.finish()));
        compute::wait_for_submission(&self.device, &self.queue)
    }
}

/// Runs `ticks` frames offscreen and saves the final one as a PNG in the
/// configured output directory.
pub fn run_headless(config: RendererConfig, ticks: u32) -> Result<PathBuf> {
    let source = load_raymarch_source(config.shader_dir.as_deref())?;
    let mut state = pollster::block_on(HeadlessState::new(
        config.resolution,
        config.capacity.total(),
        &source,
    ))?;
    let context = FrameContext::new(
        config.presets,
        config.scene,
        config.resolution,
        config.capacity,
        config.camera_speed,
    )?;
    let mut frame_loop = FrameLoop::new(context);

    for _ in 0..ticks.max(1) {
        let report = frame_loop.tick(&mut state).context("headless tick failed")?;
        if let Some(stats) = report.stats {
            info!(frame = report.frame_index, %stats, "headless frame stats");
        }
    }

    let image = screenshot::capture(&state.device, &state.queue, &state.kernels)?;
    let path = screenshot::save_png(&image, &config.output_dir)?;
    info!(path = %path.display(), ticks, "headless capture saved");
    Ok(path)
}
