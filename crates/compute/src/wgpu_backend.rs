//! The two ray-marching kernels on a [`wgpu`] device.
//!
//! [`WgpuKernels`] owns the four shared buffers, the three bind groups and
//! both compute pipelines. It does not own the device or any surface; the
//! renderer decides where the frame buffer ends up.

use std::sync::mpsc;

use tracing::{debug, info};

use crate::{layout, BufferSlot, ComputeError, DispatchPlan, Kernel};

/// WGSL source of both kernels as shipped with the crate.
pub const RAYMARCH_WGSL: &str = include_str!("../../../shaders/raymarch.wgsl");

pub struct WgpuKernels {
    frame: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    shapes: wgpu::Buffer,
    shape_info: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; layout::GROUP_COUNT],
    pipeline_layout: wgpu::PipelineLayout,
    preprocess: wgpu::ComputePipeline,
    render: wgpu::ComputePipeline,
    resolution: u32,
}

impl WgpuKernels {
    /// Allocates the buffers for a `resolution`² frame and `shape_capacity`
    /// shapes and compiles both kernels from `shader_source`.
    ///
    /// # Errors
    ///
    /// [`ComputeError::Resolution`] for an untiled resolution and
    /// [`ComputeError::Pipeline`] if the shader or pipelines fail validation.
    pub fn new(
        device: &wgpu::Device,
        resolution: u32,
        shape_capacity: usize,
        shader_source: &str,
    ) -> Result<Self, ComputeError> {
        crate::validate_resolution(resolution)?;

        let storage = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST;
        let frame = create_buffer(
            device,
            BufferSlot::Frame,
            layout::frame_size(resolution),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        );
        let uniforms = create_buffer(device, BufferSlot::Uniforms, layout::UNIFORMS_SIZE, storage);
        let shapes = create_buffer(
            device,
            BufferSlot::Shapes,
            layout::shapes_size(shape_capacity),
            storage,
        );
        let shape_info = create_buffer(
            device,
            BufferSlot::ShapeInfo,
            layout::shape_info_size(shape_capacity),
            storage,
        );

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame layout"),
            entries: &[storage_entry(layout::BINDING_FRAME, false)],
        });
        let uniforms_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniforms layout"),
            entries: &[storage_entry(layout::BINDING_UNIFORMS, true)],
        });
        // preprocess writes the animated pose into each shape's scratch slots
        let objects_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("objects layout"),
            entries: &[
                storage_entry(layout::BINDING_SHAPES, false),
                storage_entry(layout::BINDING_SHAPE_INFO, true),
            ],
        });

        let bind_group = |label: &str, group_layout: &wgpu::BindGroupLayout, buffers: &[(u32, &wgpu::Buffer)]| {
            let entries: Vec<_> = buffers
                .iter()
                .map(|(binding, buffer)| wgpu::BindGroupEntry {
                    binding: *binding,
                    resource: buffer.as_entire_binding(),
                })
                .collect();
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: group_layout,
                entries: &entries,
            })
        };
        let bind_groups = [
            bind_group("frame bind group", &frame_layout, &[(layout::BINDING_FRAME, &frame)]),
            bind_group(
                "uniforms bind group",
                &uniforms_layout,
                &[(layout::BINDING_UNIFORMS, &uniforms)],
            ),
            bind_group(
                "objects bind group",
                &objects_layout,
                &[
                    (layout::BINDING_SHAPES, &shapes),
                    (layout::BINDING_SHAPE_INFO, &shape_info),
                ],
            ),
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("raymarch pipeline layout"),
            bind_group_layouts: &[&frame_layout, &uniforms_layout, &objects_layout],
            push_constant_ranges: &[],
        });

        let (preprocess, render) = create_pipelines(device, &pipeline_layout, shader_source)?;
        info!(resolution, shape_capacity, "compute kernels ready");

        Ok(Self {
            frame,
            uniforms,
            shapes,
            shape_info,
            bind_groups,
            pipeline_layout,
            preprocess,
            render,
            resolution,
        })
    }

    /// Rebuilds both pipelines from new shader text. On failure the old
    /// pipelines stay in place.
    ///
    /// # Errors
    ///
    /// [`ComputeError::Pipeline`] if the new source does not validate.
    pub fn reload(&mut self, device: &wgpu::Device, shader_source: &str) -> Result<(), ComputeError> {
        let (preprocess, render) = create_pipelines(device, &self.pipeline_layout, shader_source)?;
        self.preprocess = preprocess;
        self.render = render;
        info!("compute kernels reloaded");
        Ok(())
    }

    #[must_use]
    pub fn buffer(&self, slot: BufferSlot) -> &wgpu::Buffer {
        match slot {
            BufferSlot::Frame => &self.frame,
            BufferSlot::Uniforms => &self.uniforms,
            BufferSlot::Shapes => &self.shapes,
            BufferSlot::ShapeInfo => &self.shape_info,
        }
    }

    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Queues `bytes` at offset zero of `slot`.
    pub fn write(&self, queue: &wgpu::Queue, slot: BufferSlot, bytes: &[u8]) {
        debug_assert!(
            bytes.len() as u64 <= self.buffer(slot).size(),
            "{} write of {} bytes overflows the buffer",
            slot.label(),
            bytes.len()
        );
        queue.write_buffer(self.buffer(slot), 0, bytes);
    }

    /// Records preprocess then render into a single compute pass.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, plan: &DispatchPlan) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("raymarch pass"),
            timestamp_writes: None,
        });
        for (group, bind_group) in (0u32..).zip(self.bind_groups.iter()) {
            pass.set_bind_group(group, bind_group, &[]);
        }
        for kernel in Kernel::ALL {
            let [x, y, z] = plan.workgroups(kernel);
            pass.set_pipeline(match kernel {
                Kernel::Preprocess => &self.preprocess,
                Kernel::Render => &self.render,
            });
            pass.dispatch_workgroups(x, y, z);
        }
    }
}

/// Blocks until everything submitted to `queue` has completed.
///
/// # Errors
///
/// [`ComputeError::DeviceLost`] if the completion callback did not fire.
pub fn wait_for_submission(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<(), ComputeError> {
    let (sender, receiver) = mpsc::channel();
    queue.on_submitted_work_done(move || {
        let _ = sender.send(());
    });
    device.poll(wgpu::Maintain::Wait);
    receiver.try_recv().map_err(|_| ComputeError::DeviceLost)
}

fn create_buffer(
    device: &wgpu::Device,
    slot: BufferSlot,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    debug!(slot = slot.label(), size, "allocating buffer");
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(slot.label()),
        size,
        usage,
        mapped_at_creation: false,
    })
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipelines(
    device: &wgpu::Device,
    pipeline_layout: &wgpu::PipelineLayout,
    shader_source: &str,
) -> Result<(wgpu::ComputePipeline, wgpu::ComputePipeline), ComputeError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("raymarch"),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });
    let pipeline = |kernel: Kernel| {
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(kernel.entry_point()),
            layout: Some(pipeline_layout),
            module: &module,
            entry_point: kernel.entry_point(),
        })
    };
    let preprocess = pipeline(Kernel::Preprocess);
    let render = pipeline(Kernel::Render);
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ComputeError::Pipeline(error.to_string())),
        None => Ok((preprocess, render)),
    }
}
