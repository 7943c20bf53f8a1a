// src/viz/choropleth.rs
use eframe::egui::Color32;

use crate::api::types::MapFeatureDatum;
use crate::viz::format::format_percent;

// Ascending migration-proxy thresholds and their fills. The map and the
// legend both read this table through classify(), so they cannot disagree.
pub const GRADIENT_STOPS: [(f64, Color32); 4] = [
    (20.0, Color32::from_rgb(0x0e, 0xa5, 0xe9)),
    (40.0, Color32::from_rgb(0x14, 0xb8, 0xa6)),
    (60.0, Color32::from_rgb(0xf5, 0x9f, 0x00)),
    (80.0, Color32::from_rgb(0xef, 0x44, 0x44)),
];

// Fill for boundary features with no matching data row. Deliberately not a
// gradient color: "no data" must be distinguishable from a zero value.
pub const NO_DATA_FILL: Color32 = Color32::from_rgb(0x3a, 0x40, 0x52);

pub fn classify(value: f64) -> Color32 {
    GRADIENT_STOPS
        .iter()
        .find(|(threshold, _)| value <= *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1)
}

// Boundary datasets name regions with underscores where the backend uses
// spaces; both sides are compared post-normalization.
pub fn normalize_region_name(raw: &str) -> String {
    raw.replace('_', " ")
}

pub fn find_region<'a>(data: &'a [MapFeatureDatum], feature_name: &str) -> Option<&'a MapFeatureDatum> {
    let name = normalize_region_name(feature_name);
    data.iter().find(|d| d.state == name)
}

pub fn region_fill(data: &[MapFeatureDatum], feature_name: &str) -> Color32 {
    match find_region(data, feature_name) {
        Some(datum) => classify(datum.migration_proxy),
        None => NO_DATA_FILL,
    }
}

pub fn region_tooltip(data: &[MapFeatureDatum], feature_name: &str) -> String {
    match find_region(data, feature_name) {
        Some(datum) => format!(
            "{}\nMigration Proxy: {}\nGrowth: {}",
            datum.name,
            format_percent(datum.migration_proxy),
            format_percent(datum.growth_pct),
        ),
        None => format!("{}\nNo data", normalize_region_name(feature_name)),
    }
}
