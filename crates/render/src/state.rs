use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use compute::{BufferSlot, ComputeBackend, ComputeError, DispatchPlan, WgpuKernels};
use tracing::{info, warn};
use winit::window::Window;

use crate::pipeline::BlitPass;
use crate::screenshot;

/// Adapter and device shared by the windowed and headless paths.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(ComputeError::BackendUnavailable)?;
    info!(adapter = %adapter.get_info().name, "using adapter");

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Marcher Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        )
        .await
        .context("failed to request device")?;
    Ok((adapter, device, queue))
}

/// Window-backed GPU state: kernels plus a swapchain to present into.
pub struct State {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    kernels: WgpuKernels,
    blit: BlitPass,
}

impl State {
    pub async fn new(
        window: Arc<Window>,
        resolution: u32,
        shape_capacity: usize,
        shader_source: &str,
    ) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // the kernels already gamma-encode, so prefer a non-sRGB target
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let kernels = WgpuKernels::new(&device, resolution, shape_capacity, shader_source)?;
        let blit = BlitPass::new(
            &device,
            format,
            kernels.buffer(BufferSlot::Frame),
            kernels.buffer(BufferSlot::Uniforms),
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            kernels,
            blit,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Swaps in new kernel source, keeping the old pipelines if it fails.
    pub fn reload_shader(&mut self, source: &str) -> Result<(), ComputeError> {
        self.kernels.reload(&self.device, source)
    }

    /// Reads the last completed frame back and writes it as a PNG in `dir`.
    pub fn save_screenshot(&self, dir: &Path) -> Result<PathBuf> {
        let image = screenshot::capture(&self.device, &self.queue, &self.kernels)?;
        screenshot::save_png(&image, dir)
    }
}

impl ComputeBackend for State {
    fn write_buffer(&mut self, slot: BufferSlot, bytes: &[u8]) {
        self.kernels.write(&self.queue, slot, bytes);
    }

    fn submit(&mut self, plan: &DispatchPlan) -> Result<(), ComputeError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Err(ComputeError::Surface("surface was lost or outdated".into()));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(ComputeError::OutOfMemory),
            Err(e) => return Err(ComputeError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });
        self.kernels.encode(&mut encoder, plan);
        self.blit.encode(&mut encoder, &view);
        self.queue.submit(Some(encoder.finish()));
        output.present();

        compute::wait_for_submission(&self.device, &self.queue)
    }
}
