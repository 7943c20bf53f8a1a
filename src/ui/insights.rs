// src/ui/insights.rs
use eframe::egui;

use crate::state::AppState;
use crate::ui::{panel_heading, show_view_status};

pub fn show_insights_view(ui: &mut egui::Ui, state: &AppState) {
    panel_heading(
        ui,
        "Insights & Interpretation",
        "Executive Brief",
        "Dynamic notes update with every filter change.",
    );

    let Some(insights) = show_view_status(ui, state.engine.insights()) else {
        return;
    };
    if insights.is_empty() {
        ui.weak("No insights available");
        return;
    }
    for item in insights {
        ui.horizontal_wrapped(|ui| {
            ui.label("•");
            ui.label(item);
        });
    }
}
