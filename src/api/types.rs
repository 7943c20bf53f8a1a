// src/api/types.rs
use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

// Wire types for the tracker API. Field names on the wire are camelCase.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub states: Vec<String>,
    pub districts: BTreeMap<String, Vec<String>>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    #[serde(default)]
    pub quick_presets: BTreeMap<String, String>,
}

impl MetaResponse {
    pub fn districts_for(&self, state: &str) -> &[String] {
        self.districts.get(state).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_activity: i64,
    pub adult_share_pct: f64,
    pub states_signal: f64,
    pub average_growth: f64,
    pub states_covered: u32,
    pub window: DateWindow,
    pub last_refreshed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesPoint {
    pub date: String,
    pub adult_share: f64,
    pub total_activity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFeatureDatum {
    pub id: String,
    pub state: String,
    pub name: String,
    pub migration_proxy: f64,
    pub growth_pct: f64,
    pub total_activity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub state: String,
    pub growth_pct: f64,
    pub total_activity: i64,
    pub migration_proxy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonsResponse {
    pub states: Vec<MapFeatureDatum>,
    pub scatter: Vec<ScatterPoint>,
}
