//! Host side of the ray marcher: scene serialization, the frame loop,
//! the camera and presentation.

use std::path::PathBuf;

use scene::{PresetLibrary, SceneCapacity, SceneRef};

pub mod camera;
pub mod commands;
pub mod context;
pub mod frame;
pub mod gpu_types;
pub mod headless;
pub mod input;
pub mod pipeline;
pub mod run;
pub mod screenshot;
pub mod serializer;
pub mod state;

pub use headless::run_headless;
pub use run::run;

/// Everything a renderer needs to start.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Edge length of the square frame, a positive multiple of 16
    pub resolution: u32,
    pub camera_speed: f32,
    /// Scene loaded at startup
    pub scene: SceneRef,
    pub presets: PresetLibrary,
    pub capacity: SceneCapacity,
    /// Directory holding `raymarch.wgsl`; the built-in kernels are used
    /// when unset
    pub shader_dir: Option<PathBuf>,
    /// Where screenshots and scene exports go
    pub output_dir: PathBuf,
}
