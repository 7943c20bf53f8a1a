// src/ui/mod.rs
use eframe::egui;
use serde::Serialize;

use crate::query::ViewResult;
use crate::viz::export::export_with_dialog;

pub mod chart;
pub mod comparisons;
pub mod insights;
pub mod kpi;
pub mod map;
pub mod sidebar;

pub fn panel_heading(ui: &mut egui::Ui, badge: &str, title: &str, subtitle: &str) {
    ui.small(badge);
    ui.heading(title);
    if !subtitle.is_empty() {
        ui.weak(subtitle);
    }
    ui.add_space(6.0);
}

// Renders the pending/failed states for a view and hands back the data when
// there is any. One failed view only blanks its own panel.
pub fn show_view_status<'a, T>(ui: &mut egui::Ui, result: &'a ViewResult<T>) -> Option<&'a T> {
    match result {
        ViewResult::Pending => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Loading...");
            });
            None
        }
        ViewResult::Failed(reason) => {
            ui.colored_label(
                egui::Color32::LIGHT_RED,
                format!("Failed to load: {}", reason),
            );
            None
        }
        ViewResult::Ready(data) => Some(data),
    }
}

// Shared "Export CSV" button. Returns a status line for the app shell when
// an export completed or failed.
pub fn export_button<T: Serialize>(
    ui: &mut egui::Ui,
    records: &[T],
    suggested_name: &str,
) -> Option<String> {
    if !ui.button("Export CSV").clicked() {
        return None;
    }
    match export_with_dialog(records, suggested_name) {
        Ok(Some(path)) => Some(format!("Exported {}", path.display())),
        Ok(None) => None,
        Err(err) => Some(format!("Export failed: {:#}", err)),
    }
}
