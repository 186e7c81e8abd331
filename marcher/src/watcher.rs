//! # Shader Hot-Reloading
//!
//! Watches a shader directory and forwards the paths of changed `.wgsl`
//! files over a channel. The frame loop drains the channel at the start of a
//! tick and rebuilds its pipelines; the watcher itself never touches the GPU.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tracing::{debug, error, info};

const SHADER_EXTENSION: &str = "wgsl";

/// Starts watching `dir` recursively. Changed shader paths arrive on the
/// returned receiver until the [`RecommendedWatcher`] is dropped.
///
/// # Errors
///
/// Fails when `dir` does not exist or the platform watcher cannot be created.
pub fn start(dir: &Path) -> Result<(RecommendedWatcher, Receiver<PathBuf>)> {
    if !dir.is_dir() {
        anyhow::bail!("shader directory {} not found", dir.display());
    }
    let (sender, changes) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |result| handle_file_event(&sender, result))
        .context("failed to create file watcher")?;
    watcher
        .watch(dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;

    info!(dir = %dir.display(), "shader watcher active");
    Ok((watcher, changes))
}

pub fn is_shader_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SHADER_EXTENSION)
}

fn handle_file_event(sender: &Sender<PathBuf>, result: notify::Result<Event>) {
    match result {
        Ok(event) => {
            for path in shader_changes(&event) {
                debug!(path = %path.display(), "shader changed");
                // the loop has exited when the receiver is gone
                let _ = sender.send(path);
            }
        }
        Err(e) => error!("file watcher error: {e:?}"),
    }
}

/// Shader files created or modified by `event`.
pub fn shader_changes(event: &Event) -> Vec<PathBuf> {
    if !event.kind.is_modify() && !event.kind.is_create() {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|path| is_shader_file(path))
        .cloned()
        .collect()
}
