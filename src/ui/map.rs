// src/ui/map.rs
use eframe::egui::{self, Color32, Pos2, Sense, Stroke};
use eframe::egui::epaint::PathShape;

use crate::api::params::DetailLevel;
use crate::api::types::MapFeatureDatum;
use crate::geo::{self, BoundarySet};
use crate::state::AppState;
use crate::ui::{export_button, panel_heading, show_view_status};
use crate::viz::choropleth::{region_fill, region_tooltip, GRADIENT_STOPS};
use crate::viz::format::{format_number, format_percent};

const MAP_HEIGHT: f32 = 420.0;

pub fn show_map_view(ui: &mut egui::Ui, state: &mut AppState) {
    panel_heading(
        ui,
        "Geographic Visualization",
        "Migration Intensity Choropleth",
        "Hover for migration proxy & growth.",
    );

    let data = match show_view_status(ui, state.engine.map()) {
        Some(data) => data.clone(),
        None => return,
    };

    let level = state
        .engine
        .map_key()
        .and_then(|key| key.level)
        .unwrap_or(DetailLevel::State);
    let file_name = format!("{}-map.csv", level.as_param());
    if let Some(status) = export_button(ui, &data, &file_name) {
        state.export_status = Some(status);
    }
    ui.add_space(6.0);

    match &state.boundaries {
        Some(boundaries) => {
            show_choropleth(ui, boundaries, &data);
            show_legend(ui);
        }
        // Boundary file missing: keep the data readable instead of failing
        // the whole panel.
        None => show_region_table(ui, &data),
    }
}

// Equirectangular fit of the boundary rings into the panel rect, uniform
// scale, vertically flipped (lat grows north, screen y grows down).
struct Projection {
    min: [f64; 2],
    scale: f64,
    offset: Pos2,
    height: f32,
}

impl Projection {
    fn fit(bounds: ([f64; 2], [f64; 2]), rect: egui::Rect) -> Self {
        let (min, max) = bounds;
        let span_x = (max[0] - min[0]).max(f64::EPSILON);
        let span_y = (max[1] - min[1]).max(f64::EPSILON);
        let scale = (rect.width() as f64 / span_x).min(rect.height() as f64 / span_y);
        let drawn_w = (span_x * scale) as f32;
        let drawn_h = (span_y * scale) as f32;
        let offset = Pos2::new(
            rect.left() + (rect.width() - drawn_w) / 2.0,
            rect.top() + (rect.height() - drawn_h) / 2.0,
        );
        Self {
            min,
            scale,
            offset,
            height: drawn_h,
        }
    }

    fn to_screen(&self, point: [f64; 2]) -> Pos2 {
        let x = ((point[0] - self.min[0]) * self.scale) as f32;
        let y = ((point[1] - self.min[1]) * self.scale) as f32;
        Pos2::new(self.offset.x + x, self.offset.y + self.height - y)
    }

    fn to_lonlat(&self, pos: Pos2) -> [f64; 2] {
        let x = (pos.x - self.offset.x) as f64 / self.scale + self.min[0];
        let y = (self.offset.y + self.height - pos.y) as f64 / self.scale + self.min[1];
        [x, y]
    }
}

fn show_choropleth(ui: &mut egui::Ui, boundaries: &BoundarySet, data: &[MapFeatureDatum]) {
    let Some(bounds) = boundaries.bounds() else {
        show_region_table(ui, data);
        return;
    };

    let size = egui::vec2(ui.available_width(), MAP_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let projection = Projection::fit(bounds, response.rect);
    let stroke = Stroke::new(1.0, Color32::from_white_alpha(64));

    for region in &boundaries.regions {
        let fill = region_fill(data, &region.name);
        for ring in &region.rings {
            let points: Vec<Pos2> = ring.iter().map(|p| projection.to_screen(*p)).collect();
            painter.add(PathShape {
                points,
                closed: true,
                fill,
                stroke,
            });
        }
    }

    if let Some(pointer) = response.hover_pos() {
        let [lon, lat] = projection.to_lonlat(pointer);
        if let Some(region) = boundaries
            .regions
            .iter()
            .find(|region| geo::region_contains(region, lon, lat))
        {
            egui::show_tooltip_at_pointer(ui.ctx(), egui::Id::new("map_tooltip"), |ui| {
                ui.label(region_tooltip(data, &region.name));
            });
        }
    }
}

fn show_legend(ui: &mut egui::Ui) {
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.weak("Low");
        for (_, color) in GRADIENT_STOPS {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(28.0, 12.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, color);
        }
        ui.weak("High");
    });
}

fn show_region_table(ui: &mut egui::Ui, data: &[MapFeatureDatum]) {
    ui.weak("Boundary dataset unavailable; showing regions as a table.");
    ui.add_space(4.0);
    if data.is_empty() {
        ui.weak("No data for the selected filters.");
        return;
    }

    egui::ScrollArea::vertical()
        .max_height(MAP_HEIGHT)
        .show(ui, |ui| {
            egui::Grid::new("map_fallback_grid")
                .num_columns(4)
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("Region");
                    ui.strong("Migration Proxy");
                    ui.strong("Growth");
                    ui.strong("Total Activity");
                    ui.end_row();

                    for row in data {
                        ui.colored_label(
                            crate::viz::choropleth::classify(row.migration_proxy),
                            &row.name,
                        );
                        ui.label(format_percent(row.migration_proxy));
                        ui.label(format_percent(row.growth_pct));
                        ui.label(format_number(row.total_activity as f64));
                        ui.end_row();
                    }
                });
        });
}
