//! GPU-compatible type definitions for the compute kernels
//!
//! Every record here is `Pod` and mirrors a WGSL struct in
//! `shaders/raymarch.wgsl` field for field.

use bytemuck::{Pod, Zeroable};
use compute::layout;
use scene::{CompositionEntry, RenderSettings, Shape, ShapeCounts};

use crate::camera::Camera;

/// The per-frame uniform block.
///
/// Every field is an `f32`, counts and flags and packed colors included, so
/// the block is one flat float array on the wire.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    /// Seconds since the loop started
    pub time: f32,
    /// Frame edge length in pixels
    pub rez: f32,
    pub sphere_count: f32,
    pub box_count: f32,
    pub torus_count: f32,
    pub max_marching_steps: f32,
    pub camera: [f32; 3],
    pub lookat: [f32; 3],
    /// Packed `0xRRGGBB`
    pub background_color1: f32,
    pub sun: [f32; 3],
    pub sun_color: f32,
    pub show_floor: f32,
    pub mandelbulb: f32,
    pub weird_scene: f32,
    pub far_plane: f32,
    pub soft_shadow_k: f32,
    pub marching_step: f32,
    pub epsilon: f32,
    pub soft_shadow_min: f32,
    pub soft_shadow_max: f32,
    pub outline_post_process: f32,
    pub outline_width: f32,
    pub outline_color: f32,
    pub background_color2: f32,
    pub background_color3: f32,
}

const _: () = assert!(std::mem::size_of::<Uniforms>() as u64 == layout::UNIFORMS_SIZE);

#[allow(clippy::cast_precision_loss)]
impl Uniforms {
    /// Assembles the block from live state. Camera pose and counts are read
    /// fresh on every call.
    pub fn new(
        time: f32,
        resolution: u32,
        counts: ShapeCounts,
        settings: &RenderSettings,
        camera: &Camera,
    ) -> Self {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        let [background1, background2, background3] = settings.background;
        Self {
            time,
            rez: resolution as f32,
            sphere_count: counts.spheres as f32,
            box_count: counts.boxes as f32,
            torus_count: counts.toruses as f32,
            max_marching_steps: settings.max_marching_steps as f32,
            camera: camera.position.to_array(),
            lookat: camera.target.to_array(),
            background_color1: background1.pack() as f32,
            sun: settings.sun.to_array(),
            sun_color: settings.sun_color.pack() as f32,
            show_floor: flag(settings.show_floor),
            mandelbulb: flag(settings.mandelbulb),
            weird_scene: flag(settings.weird_scene),
            far_plane: settings.far_plane,
            soft_shadow_k: settings.soft_shadow_k,
            marching_step: settings.marching_step,
            epsilon: settings.epsilon,
            soft_shadow_min: settings.soft_shadow_min,
            soft_shadow_max: settings.soft_shadow_max,
            outline_post_process: flag(settings.outline_post_process),
            outline_width: settings.outline_width,
            outline_color: settings.outline_color.pack() as f32,
            background_color2: background2.pack() as f32,
            background_color3: background3.pack() as f32,
        }
    }
}

/// GPU representation of one shape
///
/// Nine four-wide slots. The last two are scratch space the preprocess
/// kernel fills with the animated pose; the host always sends zeros there.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeGpu {
    pub transform: [f32; 4],
    /// Kind-specific size parameters
    pub radius: [f32; 4],
    /// Euler angles in radians
    pub rotation: [f32; 4],
    /// Operator selector followed by its parameters
    pub op: [f32; 4],
    pub color: [f32; 4],
    pub animate_transform: [f32; 4],
    pub animate_rotation: [f32; 4],
    pub _reserved: [[f32; 4]; 2],
}

const _: () = assert!(std::mem::size_of::<ShapeGpu>() as u64 == layout::SHAPE_STRIDE);

impl From<&Shape> for ShapeGpu {
    fn from(shape: &Shape) -> Self {
        Self {
            transform: shape.transform.extend(0.0).to_array(),
            radius: shape.primitive().size(),
            rotation: shape.rotation.extend(0.0).to_array(),
            op: shape.op.to_array(),
            color: [shape.color.r, shape.color.g, shape.color.b, 0.0],
            animate_transform: shape.animate_transform.to_array(),
            animate_rotation: shape.animate_rotation.to_array(),
            _reserved: [[0.0; 4]; 2],
        }
    }
}

/// GPU representation of one composition step: `(kindId, index, selector, 0)`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeInfoGpu {
    pub kind: f32,
    pub index: f32,
    pub operator: f32,
    pub _pad: f32,
}

const _: () = assert!(std::mem::size_of::<ShapeInfoGpu>() as u64 == layout::SHAPE_INFO_STRIDE);

impl From<CompositionEntry> for ShapeInfoGpu {
    fn from(entry: CompositionEntry) -> Self {
        let [kind, index, operator, pad] = entry.to_array();
        Self {
            kind,
            index,
            operator,
            _pad: pad,
        }
    }
}
