//! Wine Export Dashboard
//!
//! Loads a semicolon-delimited wine export table, reshapes it to a tidy
//! long format and shows the filtered data as a grid plus three charts.

mod charts;
mod config;
mod data;
mod gui;

use config::DashboardConfig;
use eframe::egui;
use gui::WineExportApp;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> eframe::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = match DashboardConfig::load_or_default(Path::new(DashboardConfig::FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config load failed: {e:#}; using defaults");
            DashboardConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("Wine Export Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Wine Export Analysis",
        options,
        Box::new(move |cc| Ok(Box::new(WineExportApp::new(cc, config)))),
    )
}
