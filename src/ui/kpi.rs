// src/ui/kpi.rs
use eframe::egui;

use crate::api::types::SummaryResponse;
use crate::viz::format::{format_number, format_percent};

struct KpiCard {
    label: &'static str,
    value: String,
    trend: String,
}

pub fn show_kpi_row(ui: &mut egui::Ui, summary: Option<&SummaryResponse>) {
    let cards = match summary {
        Some(data) => vec![
            KpiCard {
                label: "Total Aadhaar Activity",
                value: format_number(data.total_activity as f64),
                trend: format!(
                    "Working-age share: {}",
                    format_percent(data.adult_share_pct)
                ),
            },
            KpiCard {
                label: "% States Showing Migration Signal",
                value: format_percent(data.states_signal),
                trend: "Threshold >52% adult share".to_string(),
            },
            KpiCard {
                label: "Average Growth %",
                value: format_percent(data.average_growth),
                trend: format!("Window {} → {}", data.window.start, data.window.end),
            },
            KpiCard {
                label: "States / UTs Covered",
                value: data.states_covered.to_string(),
                trend: format!("Updated {}", data.last_refreshed),
            },
        ],
        None => vec![
            KpiCard {
                label: "Total Aadhaar Activity",
                value: "—".to_string(),
                trend: String::new(),
            },
            KpiCard {
                label: "% States Showing Migration Signal",
                value: "—".to_string(),
                trend: "Threshold >52% adult share".to_string(),
            },
            KpiCard {
                label: "Average Growth %",
                value: "—".to_string(),
                trend: String::new(),
            },
            KpiCard {
                label: "States / UTs Covered",
                value: "—".to_string(),
                trend: String::new(),
            },
        ],
    };

    ui.columns(cards.len(), |columns| {
        for (column, card) in columns.iter_mut().zip(&cards) {
            column.group(|ui| {
                ui.set_min_height(84.0);
                ui.small(card.label);
                ui.heading(&card.value);
                ui.weak(&card.trend);
            });
        }
    });
}
