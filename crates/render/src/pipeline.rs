//! Presentation pipeline and shader sources
//!
//! The compute kernels write linear pixels into a storage buffer; the blit
//! pass draws one fullscreen triangle whose fragment shader reads that buffer.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use compute::wgpu_backend::RAYMARCH_WGSL;

/// WGSL of the fullscreen blit
pub const BLIT_WGSL: &str = include_str!("../../../shaders/blit.wgsl");

/// File name of the kernel source inside a shader directory
pub const RAYMARCH_FILE: &str = "raymarch.wgsl";

/// Loads the kernel source from `shader_dir`, or the built-in copy when no
/// directory is given.
pub fn load_raymarch_source(shader_dir: Option<&Path>) -> Result<Cow<'static, str>> {
    match shader_dir {
        Some(dir) => {
            let path = dir.join(RAYMARCH_FILE);
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read shader {}", path.display()))?;
            Ok(Cow::Owned(source))
        }
        None => Ok(Cow::Borrowed(RAYMARCH_WGSL)),
    }
}

/// Create the bind group layout for the blit pass
///
/// - binding 0: frame buffer (read-only storage)
/// - binding 1: uniforms, for the frame edge length
pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let fragment_storage = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Blit Bind Group Layout"),
        entries: &[fragment_storage(0), fragment_storage(1)],
    })
}

/// Create the blit render pipeline
///
/// No vertex buffers: the vertex shader derives the triangle from the
/// vertex index.
pub fn create_render_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Blit Shader"),
        source: wgpu::ShaderSource::Wgsl(BLIT_WGSL.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Blit Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Blit Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

/// Draws the frame buffer onto a surface texture.
pub struct BlitPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl BlitPass {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_buffer: &wgpu::Buffer,
        uniforms: &wgpu::Buffer,
    ) -> Self {
        let layout = create_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });
        Self {
            pipeline: create_render_pipeline(device, &layout, surface_format),
            bind_group,
        }
    }

    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blit"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }
}
