//! Frame capture to PNG and scene export to JSON.
//!
//! Both write into an output directory under a timestamped name so repeated
//! saves never clobber each other.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use compute::{layout, BufferSlot, WgpuKernels};
use image::RgbaImage;
use scene::ScenePreset;
use tracing::{debug, info};

/// Copies the frame buffer into a mappable staging buffer and reads it back.
pub fn capture(device: &wgpu::Device, queue: &wgpu::Queue, kernels: &WgpuKernels) -> Result<RgbaImage> {
    let resolution = kernels.resolution();
    let size = layout::frame_size(resolution);
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("screenshot staging"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("screenshot"),
    });
    encoder.copy_buffer_to_buffer(kernels.buffer(BufferSlot::Frame), 0, &staging, 0, size);
    queue.submit(Some(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    receiver
        .recv()
        .context("staging buffer map callback never ran")?
        .context("failed to map staging buffer")?;

    let pixels = {
        let data = slice.get_mapped_range();
        frame_to_rgba8(&data)
    };
    staging.unmap();

    RgbaImage::from_raw(resolution, resolution, pixels)
        .ok_or_else(|| anyhow!("frame buffer does not hold {resolution}x{resolution} pixels"))
}

/// Converts `vec4<f32>` pixels in `[0, 1]` to 8-bit RGBA.
pub fn frame_to_rgba8(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            // NaN saturates to 0 through the cast
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect()
}

fn timestamped(dir: &Path, prefix: &str, extension: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S%.3f");
    Ok(dir.join(format!("{prefix}-{stamp}.{extension}")))
}

pub fn save_png(image: &RgbaImage, dir: &Path) -> Result<PathBuf> {
    let path = timestamped(dir, "marcher", "png")?;
    image
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "saved screenshot");
    Ok(path)
}

/// Writes `preset` as pretty JSON that [`scene::PresetLibrary::load_dir`]
/// can read back.
pub fn export_scene(preset: &ScenePreset, dir: &Path) -> Result<PathBuf> {
    let path = timestamped(dir, "scene", "json")?;
    let json = preset.to_json()?;
    debug!("{json}");
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), scene = %preset.name, "exported scene");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_rgba8_clamps_and_rounds() {
        let pixels: [f32; 8] = [0.0, 0.5, 1.0, 1.0, -2.0, 7.0, f32::NAN, 0.25];
        let bytes: Vec<u8> = pixels.iter().flat_map(|v| v.to_le_bytes()).collect();

        let rgba = frame_to_rgba8(&bytes);
        println!("rgba: {:?}", rgba);

        assert_eq!(rgba, vec![0, 128, 255, 255, 0, 255, 0, 64]);
    }

    #[test]
    fn test_export_scene_round_trips_through_library() {
        let dir = std::env::temp_dir().join(format!("marcher-export-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let store = {
            let mut store = scene::SceneStore::new(scene::SceneCapacity::default());
            store.push(scene::Shape::template(scene::ShapeKind::Torus)).unwrap();
            store
        };
        let preset = ScenePreset::capture("Exported", &store, &scene::RenderSettings::default());

        let path = export_scene(&preset, &dir).unwrap();
        assert!(path.extension().is_some_and(|ext| ext == "json"));

        let mut library = scene::PresetLibrary::default();
        assert_eq!(library.load_dir(&dir).unwrap(), 1);
        let loaded = library.get(&scene::SceneRef::Name("exported".into())).unwrap();
        assert_eq!(loaded.toruses.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
