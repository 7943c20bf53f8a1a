// src/app.rs
use std::sync::Arc;

use eframe::egui;

use crate::api::client::ApiClient;
use crate::geo::BoundarySet;
use crate::query::QueryEngine;
use crate::state::{AppState, Section};
use crate::ui;

pub struct DrishtiApp {
    state: AppState,
}

impl DrishtiApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: Arc<ApiClient>,
        boundaries: Option<BoundarySet>,
    ) -> Self {
        let engine = QueryEngine::new(client, cc.egui_ctx.clone());
        let mut state = AppState::new(engine, boundaries);
        let filters = state.filters.clone();
        state.engine.sync(&filters);
        Self { state }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.small("UIDAI Migration & Urbanization Tracker");
                ui.heading("Migration Proxy & Urbanization Hotspots");
                ui.weak(format!(
                    "Executive-grade situational dashboard. Current scope: {}",
                    self.state.filters.scope_label()
                ));
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.state.engine.loading() {
                    ui.spinner();
                    ui.weak("Loading latest analytics...");
                } else if let Some(summary) = self.state.engine.summary().data() {
                    ui.weak(format!("Data refreshed: {}", summary.last_refreshed));
                }
            });
        });
    }
}

impl eframe::App for DrishtiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain finished requests before building this frame's widgets.
        self.state.engine.poll();

        egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
            self.show_header(ui);
        });

        let mut patch = None;
        egui::SidePanel::left("sidebar_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                patch = Some(ui::sidebar::show_sidebar(ui, &mut self.state));
            });
        if let Some(patch) = patch {
            self.state.apply_filters(&patch);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                match self.state.section {
                    Section::Overview => {
                        ui::kpi::show_kpi_row(ui, self.state.engine.summary().data());
                        ui.add_space(12.0);
                        ui.separator();
                        ui.add_space(12.0);
                        ui::insights::show_insights_view(ui, &self.state);
                    }
                    Section::WorkingAge => {
                        ui::chart::show_working_age_view(ui, &mut self.state);
                    }
                    Section::Map => {
                        ui::map::show_map_view(ui, &mut self.state);
                    }
                    Section::Comparisons => {
                        ui::comparisons::show_comparisons_view(ui, &mut self.state);
                    }
                }
            });
        });

        if let Some(status) = self.state.export_status.clone() {
            egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.weak(&status);
                    if ui.small_button("Dismiss").clicked() {
                        self.state.export_status = None;
                    }
                });
            });
        }

        // Filters may have changed above; re-key the queries. Unchanged
        // tuples dispatch nothing.
        self.state.engine.sync(&self.state.filters);
    }
}
