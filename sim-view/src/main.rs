//! Application entry point for the 2D n-body viewer.
//!
//! This binary parses the command line, sets up logging and eframe/egui,
//! and delegates all interactive logic and rendering to [`Viewer`].

mod cli;
mod viewer;

use anyhow::anyhow;
use clap::Parser;
use log::info;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the configuration is invalid or eframe fails to create the
///   native window or event loop.
fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = cli::Args::parse().into_settings()?;
    let viewer = Viewer::new(settings)?;
    info!("starting viewer with {} particle(s)", viewer.particle_count());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 1024.0]),
        ..Default::default()
    };

    eframe::run_native(
        "2D N-Body",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow!("eframe failed: {e}"))
}
