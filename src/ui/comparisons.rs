// src/ui/comparisons.rs
use eframe::egui;

use crate::api::types::{MapFeatureDatum, ScatterPoint};
use crate::state::AppState;
use crate::ui::{export_button, panel_heading, show_view_status};
use crate::viz::format::{format_number, format_percent};

const BAR_COLOR: egui::Color32 = egui::Color32::from_rgb(0x2a, 0xc3, 0xd6);
const SCATTER_COLOR: egui::Color32 = egui::Color32::from_rgb(0xf5, 0x9f, 0x00);

pub fn show_comparisons_view(ui: &mut egui::Ui, state: &mut AppState) {
    panel_heading(
        ui,
        "Comparative Analysis",
        "State-wise Migration Signal",
        "",
    );
    let data = match show_view_status(ui, state.engine.comparisons()) {
        Some(data) => data.clone(),
        None => return,
    };
    if let Some(status) = export_button(ui, &data.states, "state-comparison.csv") {
        state.export_status = Some(status);
    }
    if data.states.is_empty() {
        ui.weak("No data for the selected filters.");
    } else {
        show_state_bars(ui, &data.states);
    }

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(12.0);

    panel_heading(ui, "Correlation View", "Growth % vs Aadhaar Activity", "");
    if let Some(status) = export_button(ui, &data.scatter, "growth-vs-activity.csv") {
        state.export_status = Some(status);
    }
    if data.scatter.is_empty() {
        ui.weak("No data for the selected filters.");
    } else {
        show_scatter(ui, &data.scatter);
    }
}

fn show_state_bars(ui: &mut egui::Ui, states: &[MapFeatureDatum]) {
    let bars: Vec<egui_plot::Bar> = states
        .iter()
        .enumerate()
        .map(|(i, row)| egui_plot::Bar::new(i as f64, row.migration_proxy))
        .collect();
    let names: Vec<String> = states.iter().map(|row| row.state.clone()).collect();

    egui_plot::Plot::new("state_comparison_plot")
        .height(300.0)
        .include_y(0.0)
        .label_formatter(move |_name, value| {
            let index = value.x.round() as usize;
            match names.get(index) {
                Some(state) => format!("{}\nMigration Proxy: {}", state, format_percent(value.y)),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                egui_plot::BarChart::new(bars)
                    .color(BAR_COLOR)
                    .name("Migration Proxy %"),
            );
        });
}

fn show_scatter(ui: &mut egui::Ui, scatter: &[ScatterPoint]) {
    let points: Vec<[f64; 2]> = scatter
        .iter()
        .map(|row| [row.total_activity as f64, row.growth_pct])
        .collect();
    let rows = scatter.to_vec();

    egui_plot::Plot::new("growth_scatter_plot")
        .height(300.0)
        .label_formatter(move |_name, value| {
            match nearest_row(&rows, value.x, value.y) {
                Some(row) => format!(
                    "{}\nTotal Activity: {}\nGrowth: {}",
                    row.state,
                    format_number(row.total_activity as f64),
                    format_percent(row.growth_pct),
                ),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.points(
                egui_plot::Points::new(points)
                    .radius(3.5)
                    .color(SCATTER_COLOR)
                    .name("States"),
            );
        });
}

// The hover label has only plot coordinates to go on; snap to the closest
// state so the tooltip can name it.
fn nearest_row(rows: &[ScatterPoint], x: f64, y: f64) -> Option<&ScatterPoint> {
    rows.iter().min_by(|a, b| {
        let da = (a.total_activity as f64 - x).powi(2) + (a.growth_pct - y).powi(2);
        let db = (b.total_activity as f64 - x).powi(2) + (b.growth_pct - y).powi(2);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}
