// src/api/client.rs
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::params::QueryParams;
use crate::api::types::{
    ComparisonsResponse, MapFeatureDatum, MetaResponse, SummaryResponse, TimeseriesPoint,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

// Blocking HTTP client for the aggregation service. Lives behind an Arc and
// is only ever called from worker threads, never the GUI thread.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("TRACKER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("Request to {} failed", path))?
            .error_for_status()
            .with_context(|| format!("Request to {} was rejected", path))?;
        response
            .json()
            .with_context(|| format!("Response from {} was not valid JSON", path))
    }

    pub fn meta(&self) -> Result<MetaResponse> {
        self.get("/meta", &[])
    }

    pub fn summary(&self, params: &QueryParams) -> Result<SummaryResponse> {
        self.get("/summary", &params.as_query())
    }

    pub fn timeseries(&self, params: &QueryParams) -> Result<Vec<TimeseriesPoint>> {
        self.get("/timeseries", &params.as_query())
    }

    pub fn map(&self, params: &QueryParams) -> Result<Vec<MapFeatureDatum>> {
        self.get("/map", &params.as_query())
    }

    pub fn comparisons(&self, params: &QueryParams) -> Result<ComparisonsResponse> {
        self.get("/comparisons", &params.as_query())
    }

    pub fn insights(&self, params: &QueryParams) -> Result<Vec<String>> {
        self.get("/insights", &params.as_query())
    }
}
