//! HR Plot - Heart-rate time-series viewer
//!
//! Loads a recorded heart-rate file and shows it as a pannable, zoomable chart.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use config::ViewerConfig;
use eframe::egui;
use gui::HrPlotApp;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hrplot=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = ViewerConfig::from_env();
    info!("starting HR Plot");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 500.0])
            .with_drag_and_drop(true)
            .with_title("HR Plot"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "HR Plot",
        options,
        Box::new(|cc| Ok(Box::new(HrPlotApp::new(cc, config)))),
    )
}
