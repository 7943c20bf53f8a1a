// src/ui/sidebar.rs
use chrono::NaiveDate;
use eframe::egui;

use crate::api::types::MetaResponse;
use crate::state::{AppState, Section};
use crate::state::filters::{AgeLens, FilterPatch, Granularity, TimePreset};

// Navigation plus the filter controls. Every control change is collected
// into one FilterPatch; the app shell merges it through Filters::apply so
// the cascade rule lives in the model, not here.
pub fn show_sidebar(ui: &mut egui::Ui, state: &mut AppState) -> FilterPatch {
    let mut patch = FilterPatch::default();

    ui.heading("Drishti");
    ui.add_space(8.0);

    for section in Section::ALL {
        if ui
            .selectable_label(state.section == section, section.label())
            .clicked()
        {
            state.section = section;
        }
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    let meta = state.engine.meta().data().cloned();
    if state.engine.meta().error().is_some() {
        ui.colored_label(
            egui::Color32::LIGHT_RED,
            "Reference data unavailable; geography filters disabled.",
        );
        ui.add_space(4.0);
    }

    show_geography_controls(ui, state, meta.as_ref(), &mut patch);
    show_age_control(ui, state, &mut patch);
    show_window_controls(ui, state, meta.as_ref(), &mut patch);
    show_granularity_control(ui, state, &mut patch);

    patch
}

fn show_geography_controls(
    ui: &mut egui::Ui,
    state: &AppState,
    meta: Option<&MetaResponse>,
    patch: &mut FilterPatch,
) {
    let selected_state = state.filters.state.clone();

    ui.label("State");
    egui::ComboBox::from_id_source("state_filter")
        .width(ui.available_width())
        .selected_text(selected_state.as_deref().unwrap_or("All India").to_string())
        .show_ui(ui, |ui| {
            if ui
                .selectable_label(selected_state.is_none(), "All India")
                .clicked()
            {
                patch.state = Some(None);
            }
            if let Some(meta) = meta {
                for name in &meta.states {
                    if ui
                        .selectable_label(selected_state.as_deref() == Some(name.as_str()), name)
                        .clicked()
                    {
                        patch.state = Some(Some(name.clone()));
                    }
                }
            }
        });
    ui.add_space(4.0);

    let districts: Vec<String> = match (&selected_state, meta) {
        (Some(name), Some(meta)) => meta.districts_for(name).to_vec(),
        _ => Vec::new(),
    };
    let selected_district = state.filters.district.clone();

    ui.label("District");
    ui.add_enabled_ui(selected_state.is_some(), |ui| {
        egui::ComboBox::from_id_source("district_filter")
            .width(ui.available_width())
            .selected_text(
                selected_district
                    .as_deref()
                    .unwrap_or("All Districts")
                    .to_string(),
            )
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(selected_district.is_none(), "All Districts")
                    .clicked()
                {
                    patch.district = Some(None);
                }
                for name in &districts {
                    if ui
                        .selectable_label(selected_district.as_deref() == Some(name.as_str()), name)
                        .clicked()
                    {
                        patch.district = Some(Some(name.clone()));
                    }
                }
            });
    });
    ui.add_space(4.0);
}

fn show_age_control(ui: &mut egui::Ui, state: &AppState, patch: &mut FilterPatch) {
    ui.label("Age Lens");
    egui::ComboBox::from_id_source("age_lens_filter")
        .width(ui.available_width())
        .selected_text(state.filters.age_lens.label())
        .show_ui(ui, |ui| {
            for lens in [AgeLens::All, AgeLens::WorkingAge] {
                if ui
                    .selectable_label(state.filters.age_lens == lens, lens.label())
                    .clicked()
                {
                    patch.age_lens = Some(lens);
                }
            }
        });
    ui.add_space(4.0);
}

fn show_window_controls(
    ui: &mut egui::Ui,
    state: &mut AppState,
    meta: Option<&MetaResponse>,
    patch: &mut FilterPatch,
) {
    ui.label("Time Window");
    egui::ComboBox::from_id_source("time_window_filter")
        .width(ui.available_width())
        .selected_text(state.filters.preset.label())
        .show_ui(ui, |ui| {
            for preset in TimePreset::ALL {
                if ui
                    .selectable_label(state.filters.preset == preset, preset.label())
                    .clicked()
                {
                    patch.preset = Some(preset);
                }
            }
        });
    ui.add_space(4.0);

    let showing_custom =
        state.filters.preset == TimePreset::Custom || patch.preset == Some(TimePreset::Custom);
    if !showing_custom {
        return;
    }

    if let Some(meta) = meta {
        if let (Some(min), Some(max)) = (&meta.min_date, &meta.max_date) {
            ui.weak(format!("Data available {} to {}", min, max));
        }
    }

    ui.label("Start date");
    if ui
        .text_edit_singleline(&mut state.start_input)
        .changed()
    {
        patch.start = Some(parse_date_input(&state.start_input));
    }
    ui.label("End date");
    if ui.text_edit_singleline(&mut state.end_input).changed() {
        patch.end = Some(parse_date_input(&state.end_input));
    }

    show_window_validation(ui, state);
    ui.add_space(4.0);
}

fn show_window_validation(ui: &mut egui::Ui, state: &AppState) {
    let start_bad = !state.start_input.is_empty() && parse_date_input(&state.start_input).is_none();
    let end_bad = !state.end_input.is_empty() && parse_date_input(&state.end_input).is_none();

    if start_bad || end_bad {
        ui.colored_label(egui::Color32::LIGHT_RED, "Dates must be YYYY-MM-DD.");
        return;
    }
    if let (Some(start), Some(end)) = (state.filters.start, state.filters.end) {
        if end < start {
            ui.colored_label(
                egui::Color32::LIGHT_RED,
                "End date precedes start date; queries are on hold.",
            );
        }
    }
}

fn show_granularity_control(ui: &mut egui::Ui, state: &AppState, patch: &mut FilterPatch) {
    ui.label("Period Granularity");
    egui::ComboBox::from_id_source("granularity_filter")
        .width(ui.available_width())
        .selected_text(state.filters.granularity.label())
        .show_ui(ui, |ui| {
            for granularity in Granularity::ALL {
                if ui
                    .selectable_label(state.filters.granularity == granularity, granularity.label())
                    .clicked()
                {
                    patch.granularity = Some(granularity);
                }
            }
        });
}

fn parse_date_input(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}
