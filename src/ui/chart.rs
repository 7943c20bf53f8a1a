// src/ui/chart.rs
use eframe::egui;

use crate::api::types::TimeseriesPoint;
use crate::state::AppState;
use crate::ui::{export_button, panel_heading, show_view_status};
use crate::viz::format::format_number;

const SHARE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x2a, 0xc3, 0xd6);
const ACTIVITY_COLOR: egui::Color32 = egui::Color32::from_rgb(0xf5, 0x9f, 0x00);

pub fn show_working_age_view(ui: &mut egui::Ui, state: &mut AppState) {
    panel_heading(
        ui,
        "Working-Age Migration Signal (Proxy)",
        "Adult Share of Aadhaar Activity",
        "18+ activity as % of total, across selected geography & window.",
    );

    let points = match show_view_status(ui, state.engine.timeseries()) {
        Some(points) => points.clone(),
        None => return,
    };
    if points.is_empty() {
        ui.weak("No data for the selected filters.");
        return;
    }

    if let Some(status) = export_button(ui, &points, "working-age-timeseries.csv") {
        state.export_status = Some(status);
    }

    ui.columns(2, |columns| {
        show_share_plot(&mut columns[0], &points);
        show_activity_plot(&mut columns[1], &points);
    });
}

fn period_labels(points: &[TimeseriesPoint]) -> Vec<String> {
    points.iter().map(|p| p.date.clone()).collect()
}

fn show_share_plot(ui: &mut egui::Ui, points: &[TimeseriesPoint]) {
    let series: Vec<[f64; 2]> = points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.adult_share])
        .collect();
    let labels = period_labels(points);

    egui_plot::Plot::new("adult_share_plot")
        .height(300.0)
        .include_y(0.0)
        .include_y(100.0)
        .label_formatter(move |_name, value| {
            let index = value.x.round() as usize;
            match labels.get(index) {
                Some(date) => format!("{}\nAdult Share: {:.1}%", date, value.y),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                egui_plot::Line::new(series)
                    .color(SHARE_COLOR)
                    .width(2.0)
                    .name("Adult Share %"),
            );
        });
}

fn show_activity_plot(ui: &mut egui::Ui, points: &[TimeseriesPoint]) {
    let bars: Vec<egui_plot::Bar> = points
        .iter()
        .enumerate()
        .map(|(i, p)| egui_plot::Bar::new(i as f64, p.total_activity as f64))
        .collect();
    let labels = period_labels(points);

    egui_plot::Plot::new("total_activity_plot")
        .height(300.0)
        .include_y(0.0)
        .label_formatter(move |_name, value| {
            let index = value.x.round() as usize;
            match labels.get(index) {
                Some(date) => format!("{}\nTotal Activity: {}", date, format_number(value.y)),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                egui_plot::BarChart::new(bars)
                    .color(ACTIVITY_COLOR)
                    .name("Total Aadhaar Activity"),
            );
        });
}
