#![deny(clippy::all, clippy::pedantic)]

//! The compute half of the ray marcher.
//!
//! Two kernels run back to back every frame: `preprocess` bakes animated
//! shape poses into scratch slots of the shape buffer, then `render` marches
//! one ray per pixel into the frame buffer. This crate owns the contract
//! between host and shader (bind groups, buffer sizes, workgroup counts) and
//! the backends that honor it.

use thiserror::Error;

mod dispatch;
pub mod layout;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "gpu")]
pub mod wgpu_backend;

pub use dispatch::{preprocess_workgroups, validate_resolution, DispatchPlan, THREAD_COUNT};
#[cfg(feature = "mock")]
pub use mock::{BackendCall, MockBackend};
#[cfg(feature = "gpu")]
pub use wgpu_backend::{wait_for_submission, WgpuKernels};

#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("resolution {0} is not a positive multiple of {}", THREAD_COUNT)]
    Resolution(u32),
    #[error("pipeline setup failed: {0}")]
    Pipeline(String),
    #[error("surface unavailable: {0}")]
    Surface(String),
    #[error("out of device memory")]
    OutOfMemory,
    #[error("device lost while waiting for submitted work")]
    DeviceLost,
    #[error("backend not available")]
    BackendUnavailable,
}

/// The two compute entry points, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    Preprocess,
    Render,
}

impl Kernel {
    pub const ALL: [Self; 2] = [Self::Preprocess, Self::Render];

    /// WGSL entry point name.
    #[must_use]
    pub const fn entry_point(self) -> &'static str {
        match self {
            Self::Preprocess => "preprocess",
            Self::Render => "render",
        }
    }
}

/// Device buffers shared by both kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    Frame,
    Uniforms,
    Shapes,
    ShapeInfo,
}

impl BufferSlot {
    pub const ALL: [Self; 4] = [Self::Frame, Self::Uniforms, Self::Shapes, Self::ShapeInfo];

    #[must_use]
    pub const fn group(self) -> u32 {
        match self {
            Self::Frame => layout::GROUP_FRAME,
            Self::Uniforms => layout::GROUP_UNIFORMS,
            Self::Shapes | Self::ShapeInfo => layout::GROUP_OBJECTS,
        }
    }

    #[must_use]
    pub const fn binding(self) -> u32 {
        match self {
            Self::Frame => layout::BINDING_FRAME,
            Self::Uniforms => layout::BINDING_UNIFORMS,
            Self::Shapes => layout::BINDING_SHAPES,
            Self::ShapeInfo => layout::BINDING_SHAPE_INFO,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Frame => "frame buffer",
            Self::Uniforms => "uniforms",
            Self::Shapes => "shapes",
            Self::ShapeInfo => "shape info",
        }
    }
}

/// Something that can run one frame of the two-kernel protocol.
///
/// `write_buffer` queues host data for a slot; `submit` dispatches both
/// kernels with the given workgroup counts, presents the result and blocks
/// until the device has finished.
pub trait ComputeBackend {
    fn write_buffer(&mut self, slot: BufferSlot, bytes: &[u8]);

    /// # Errors
    ///
    /// A recoverable [`ComputeError::Surface`] when the frame could not be
    /// presented, or a fatal error when the device went away.
    fn submit(&mut self, plan: &DispatchPlan) -> Result<(), ComputeError>;
}
