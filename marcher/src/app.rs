//! # Marcher Application Logic
//!
//! Turns the parsed command line into one of three runs: listing scenes,
//! an offscreen capture, or the interactive window with optional shader
//! hot reload.

use anyhow::Result;
use tracing::{error, info};

use crate::config::Cli;
use crate::watcher;

/// Runs the application described by `cli`.
///
/// # Errors
///
/// Returns configuration errors (unknown scene, unreadable preset directory),
/// GPU setup failures, and fatal frame errors.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.renderer_config()?;

    if cli.list_scenes {
        for (index, name) in config.presets.names().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    if let Some(ticks) = cli.headless {
        let path = render::run_headless(config, ticks)?;
        println!("{}", path.display());
        return Ok(());
    }

    // the watcher half must outlive the window
    let (_shader_watcher, changes) = match &cli.shader_dir {
        Some(dir) => match watcher::start(dir) {
            Ok((watcher, changes)) => (Some(watcher), Some(changes)),
            Err(e) => {
                error!("shader hot reload disabled: {e:#}");
                (None, None)
            }
        },
        None => (None, None),
    };

    info!(scene = %cli.scene, resolution = cli.resolution, "starting renderer");
    render::run(config, changes)
}
