//! Command line configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use render::RendererConfig;
use scene::{PresetLibrary, SceneCapacity, SceneRef};

#[derive(Parser, Debug, Clone)]
#[command(name = "marcher", version, about = "Real-time CSG ray marcher over GPU compute")]
pub struct Cli {
    /// Scene to load, by name or by index into the preset list
    #[arg(long, default_value = "main")]
    pub scene: SceneRef,

    /// Edge length of the square frame in pixels (multiple of 16)
    #[arg(long, default_value_t = 768, value_parser = parse_resolution)]
    pub resolution: u32,

    /// Flying speed in world units per second
    #[arg(long, default_value_t = render::camera::DEFAULT_SPEED)]
    pub camera_speed: f32,

    /// Directory of extra `*.json` scene presets
    #[arg(long)]
    pub scene_dir: Option<PathBuf>,

    /// Directory holding `raymarch.wgsl`; it is watched and hot-reloaded
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,

    /// Where screenshots and scene exports are written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the available scenes and exit
    #[arg(long)]
    pub list_scenes: bool,

    /// Render this many frames without a window, save the last one and exit
    #[arg(long, value_name = "TICKS")]
    pub headless: Option<u32>,
}

fn parse_resolution(value: &str) -> Result<u32, String> {
    let resolution: u32 = value.parse().map_err(|e| format!("{e}"))?;
    compute::validate_resolution(resolution).map_err(|e| e.to_string())
}

impl Cli {
    /// Built-in presets plus everything in `--scene-dir`.
    pub fn presets(&self) -> Result<PresetLibrary> {
        let mut presets = PresetLibrary::builtin().context("built-in presets are malformed")?;
        if let Some(dir) = &self.scene_dir {
            let loaded = presets
                .load_dir(dir)
                .with_context(|| format!("failed to load scenes from {}", dir.display()))?;
            tracing::info!(loaded, dir = %dir.display(), "loaded scene presets");
        }
        Ok(presets)
    }

    pub fn renderer_config(&self) -> Result<RendererConfig> {
        Ok(RendererConfig {
            resolution: self.resolution,
            camera_speed: self.camera_speed,
            scene: self.scene.clone(),
            presets: self.presets()?,
            capacity: SceneCapacity::default(),
            shader_dir: self.shader_dir.clone(),
            output_dir: self.output_dir.clone(),
        })
    }
}
