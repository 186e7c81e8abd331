//! Bind-group layout and buffer sizing shared with the WGSL kernels.

pub const GROUP_FRAME: u32 = 0;
pub const GROUP_UNIFORMS: u32 = 1;
pub const GROUP_OBJECTS: u32 = 2;
pub const GROUP_COUNT: usize = 3;

pub const BINDING_FRAME: u32 = 0;
pub const BINDING_UNIFORMS: u32 = 0;
pub const BINDING_SHAPES: u32 = 0;
pub const BINDING_SHAPE_INFO: u32 = 1;

const SCALAR: u64 = 4;
const VEC4: u64 = 4 * SCALAR;

/// Scalars in the uniform block.
pub const UNIFORM_SCALARS: u64 = 31;
/// Four-wide slots per shape record, the last two being kernel scratch.
pub const SHAPE_SLOTS: u64 = 9;
pub const SHAPE_STRIDE: u64 = SHAPE_SLOTS * VEC4;
pub const SHAPE_INFO_STRIDE: u64 = VEC4;
/// One RGBA `f32` pixel.
pub const PIXEL_STRIDE: u64 = VEC4;

pub const UNIFORMS_SIZE: u64 = UNIFORM_SCALARS * SCALAR;

const _: () = assert!(SHAPE_STRIDE == 144);
const _: () = assert!(UNIFORMS_SIZE == 124);

/// Size of the shape buffer for `capacity` shapes. Never zero, so an empty
/// scene still gets a bindable buffer.
#[must_use]
pub const fn shapes_size(capacity: usize) -> u64 {
    max1(capacity as u64) * SHAPE_STRIDE
}

#[must_use]
pub const fn shape_info_size(capacity: usize) -> u64 {
    max1(capacity as u64) * SHAPE_INFO_STRIDE
}

#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn frame_size(resolution: u32) -> u64 {
    resolution as u64 * resolution as u64 * PIXEL_STRIDE
}

const fn max1(n: u64) -> u64 {
    if n == 0 {
        1
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_scale_with_capacity() {
        assert_eq!(shapes_size(60), 60 * 144);
        assert_eq!(shape_info_size(60), 60 * 16);
        assert_eq!(shapes_size(0), 144);
        assert_eq!(frame_size(768), 768 * 768 * 16);
    }
}
