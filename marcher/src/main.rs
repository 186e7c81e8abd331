//! # Marcher
//!
//! Opens a window and ray-marches the selected scene until it is closed, or
//! renders a fixed number of frames offscreen with `--headless`.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use marcher::{app, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    app::run(Cli::parse())
}
