// src/main.rs
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod geo;
mod query;
mod state;
mod ui;
mod viz;

use app::DrishtiApp;

const DEFAULT_BOUNDARY_FILE: &str = "india_states.geo.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = Arc::new(api::client::ApiClient::from_env()?);
    let boundaries = load_boundaries();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Drishti"),
        ..Default::default()
    };

    eframe::run_native(
        "Drishti",
        options,
        Box::new(move |cc| Box::new(DrishtiApp::new(cc, client, boundaries))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}

// The map degrades to a table without boundaries, so a missing or broken
// file is a warning, not a startup failure.
fn load_boundaries() -> Option<geo::BoundarySet> {
    let path = std::env::var("TRACKER_BOUNDARIES")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_BOUNDARY_FILE));

    match geo::load_boundaries(&path) {
        Ok(set) => Some(set),
        Err(err) => {
            warn!(path = %path.display(), error = %format!("{:#}", err), "boundary dataset unavailable");
            None
        }
    }
}
