// src/query/mod.rs
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui;
use tracing::{debug, warn};

use crate::api::client::ApiClient;
use crate::api::params::{base_params, map_params, timeseries_params, QueryParams};
use crate::api::types::{
    ComparisonsResponse, MapFeatureDatum, MetaResponse, SummaryResponse, TimeseriesPoint,
};
use crate::state::filters::Filters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Summary,
    Timeseries,
    Map,
    Comparisons,
    Insights,
    Meta,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Summary => "summary",
            View::Timeseries => "timeseries",
            View::Map => "map",
            View::Comparisons => "comparisons",
            View::Insights => "insights",
            View::Meta => "meta",
        }
    }
}

// Tri-state result for one view. A new parameter tuple supersedes whatever
// was here; results are never merged.
#[derive(Debug, Clone)]
pub enum ViewResult<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> ViewResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ViewResult::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewResult::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewResult::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

// One keyed result slot. `key` is the tuple of the most recently issued
// request; responses for any other tuple are refused.
#[derive(Debug)]
struct Slot<T> {
    key: Option<QueryParams>,
    result: ViewResult<T>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            key: None,
            result: ViewResult::Pending,
        }
    }

    fn needs(&self, key: &QueryParams) -> bool {
        self.key.as_ref() != Some(key)
    }

    fn begin(&mut self, key: QueryParams) {
        self.key = Some(key);
        self.result = ViewResult::Pending;
    }

    fn accept(&mut self, key: &QueryParams, outcome: Result<T, String>) -> bool {
        if self.key.as_ref() != Some(key) {
            return false;
        }
        self.result = match outcome {
            Ok(data) => ViewResult::Ready(data),
            Err(reason) => ViewResult::Failed(reason),
        };
        true
    }
}

pub enum Payload {
    Summary(SummaryResponse),
    Timeseries(Vec<TimeseriesPoint>),
    Map(Vec<MapFeatureDatum>),
    Comparisons(ComparisonsResponse),
    Insights(Vec<String>),
    Meta(MetaResponse),
}

pub struct Envelope {
    view: View,
    key: QueryParams,
    payload: Result<Payload, String>,
}

// Issues one request per data view, keyed by the view's parameter tuple.
// Workers run blocking HTTP off-thread and report back over the channel;
// poll() drains it at the top of every frame.
pub struct QueryEngine {
    client: Arc<ApiClient>,
    ctx: egui::Context,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    summary: Slot<SummaryResponse>,
    timeseries: Slot<Vec<TimeseriesPoint>>,
    map: Slot<Vec<MapFeatureDatum>>,
    comparisons: Slot<ComparisonsResponse>,
    insights: Slot<Vec<String>>,
    meta: Slot<MetaResponse>,
}

impl QueryEngine {
    pub fn new(client: Arc<ApiClient>, ctx: egui::Context) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut engine = Self {
            client,
            ctx,
            tx,
            rx,
            summary: Slot::new(),
            timeseries: Slot::new(),
            map: Slot::new(),
            comparisons: Slot::new(),
            insights: Slot::new(),
            meta: Slot::new(),
        };

        // Reference data is fetched exactly once; filter changes never touch it.
        let meta_key = base_params(&Filters::default());
        engine.meta.begin(meta_key.clone());
        engine.launch(View::Meta, meta_key);
        engine
    }

    // Recompute each view's tuple and dispatch the ones that changed.
    // Ill-formed custom windows dispatch nothing at all.
    pub fn sync(&mut self, filters: &Filters) {
        for (view, key) in self.plan(filters) {
            self.launch(view, key);
        }
    }

    fn plan(&mut self, filters: &Filters) -> Vec<(View, QueryParams)> {
        if !filters.window_ready() {
            return Vec::new();
        }

        let mut dispatches = Vec::new();
        let base = base_params(filters);

        if self.summary.needs(&base) {
            self.summary.begin(base.clone());
            dispatches.push((View::Summary, base.clone()));
        }
        let ts = timeseries_params(filters);
        if self.timeseries.needs(&ts) {
            self.timeseries.begin(ts.clone());
            dispatches.push((View::Timeseries, ts));
        }
        let map = map_params(filters);
        if self.map.needs(&map) {
            self.map.begin(map.clone());
            dispatches.push((View::Map, map));
        }
        if self.comparisons.needs(&base) {
            self.comparisons.begin(base.clone());
            dispatches.push((View::Comparisons, base.clone()));
        }
        if self.insights.needs(&base) {
            self.insights.begin(base.clone());
            dispatches.push((View::Insights, base));
        }

        dispatches
    }

    fn launch(&self, view: View, key: QueryParams) {
        debug!(view = view.name(), "dispatching request");
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();

        thread::spawn(move || {
            let payload = match view {
                View::Summary => client.summary(&key).map(Payload::Summary),
                View::Timeseries => client.timeseries(&key).map(Payload::Timeseries),
                View::Map => client.map(&key).map(Payload::Map),
                View::Comparisons => client.comparisons(&key).map(Payload::Comparisons),
                View::Insights => client.insights(&key).map(Payload::Insights),
                View::Meta => client.meta().map(Payload::Meta),
            }
            .map_err(|err| format!("{:#}", err));

            // The engine may be gone during shutdown; nothing to do then.
            let _ = tx.send(Envelope { view, key, payload });
            ctx.request_repaint();
        });
    }

    pub fn poll(&mut self) {
        while let Ok(envelope) = self.rx.try_recv() {
            self.deliver(envelope);
        }
    }

    fn deliver(&mut self, envelope: Envelope) {
        let Envelope { view, key, payload } = envelope;
        if let Err(reason) = &payload {
            warn!(view = view.name(), %reason, "request failed");
        }

        let applied = match (view, payload) {
            (View::Summary, payload) => self
                .summary
                .accept(&key, payload.and_then(expect_summary)),
            (View::Timeseries, payload) => self
                .timeseries
                .accept(&key, payload.and_then(expect_timeseries)),
            (View::Map, payload) => self.map.accept(&key, payload.and_then(expect_map)),
            (View::Comparisons, payload) => self
                .comparisons
                .accept(&key, payload.and_then(expect_comparisons)),
            (View::Insights, payload) => self
                .insights
                .accept(&key, payload.and_then(expect_insights)),
            (View::Meta, payload) => self.meta.accept(&key, payload.and_then(expect_meta)),
        };

        if !applied {
            debug!(view = view.name(), "discarding stale response");
        }
    }

    // True while any of the five filter-driven views is pending. Meta has its
    // own lifecycle and does not gate the indicator.
    pub fn loading(&self) -> bool {
        self.summary.result.is_pending()
            || self.timeseries.result.is_pending()
            || self.map.result.is_pending()
            || self.comparisons.result.is_pending()
            || self.insights.result.is_pending()
    }

    pub fn summary(&self) -> &ViewResult<SummaryResponse> {
        &self.summary.result
    }

    pub fn timeseries(&self) -> &ViewResult<Vec<TimeseriesPoint>> {
        &self.timeseries.result
    }

    pub fn map(&self) -> &ViewResult<Vec<MapFeatureDatum>> {
        &self.map.result
    }

    pub fn map_key(&self) -> Option<&QueryParams> {
        self.map.key.as_ref()
    }

    pub fn comparisons(&self) -> &ViewResult<ComparisonsResponse> {
        &self.comparisons.result
    }

    pub fn insights(&self) -> &ViewResult<Vec<String>> {
        &self.insights.result
    }

    pub fn meta(&self) -> &ViewResult<MetaResponse> {
        &self.meta.result
    }
}

fn expect_summary(payload: Payload) -> Result<SummaryResponse, String> {
    match payload {
        Payload::Summary(data) => Ok(data),
        _ => Err("mismatched payload for summary view".to_string()),
    }
}

fn expect_timeseries(payload: Payload) -> Result<Vec<TimeseriesPoint>, String> {
    match payload {
        Payload::Timeseries(data) => Ok(data),
        _ => Err("mismatched payload for timeseries view".to_string()),
    }
}

fn expect_map(payload: Payload) -> Result<Vec<MapFeatureDatum>, String> {
    match payload {
        Payload::Map(data) => Ok(data),
        _ => Err("mismatched payload for map view".to_string()),
    }
}

fn expect_comparisons(payload: Payload) -> Result<ComparisonsResponse, String> {
    match payload {
        Payload::Comparisons(data) => Ok(data),
        _ => Err("mismatched payload for comparisons view".to_string()),
    }
}

fn expect_insights(payload: Payload) -> Result<Vec<String>, String> {
    match payload {
        Payload::Insights(data) => Ok(data),
        _ => Err("mismatched payload for insights view".to_string()),
    }
}

fn expect_meta(payload: Payload) -> Result<MetaResponse, String> {
    match payload {
        Payload::Meta(data) => Ok(data),
        _ => Err("mismatched payload for meta view".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::params::DetailLevel;
    use crate::state::filters::{AgeLens, FilterPatch, TimePreset};
    use chrono::NaiveDate;

    fn engine() -> QueryEngine {
        // Unroutable port: workers fail fast, and these tests never poll, so
        // nothing they send is observed.
        let client = Arc::new(ApiClient::new("http://127.0.0.1:1").unwrap());
        QueryEngine::new(client, egui::Context::default())
    }

    fn summary_payload() -> SummaryResponse {
        SummaryResponse {
            total_activity: 42,
            adult_share_pct: 55.0,
            states_signal: 40.0,
            average_growth: 2.0,
            states_covered: 10,
            window: crate::api::types::DateWindow {
                start: "2024-01-01".into(),
                end: "2024-03-31".into(),
            },
            last_refreshed: "2024-04-01T00:00:00".into(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn first_sync_dispatches_all_five_views() {
        let mut engine = engine();
        let dispatches = engine.plan(&Filters::default());
        assert_eq!(dispatches.len(), 5);
        assert!(engine.loading());
    }

    #[test]
    fn identical_filters_do_not_redispatch() {
        let mut engine = engine();
        let filters = Filters::default();
        assert_eq!(engine.plan(&filters).len(), 5);
        assert_eq!(engine.plan(&filters).len(), 0);
        assert_eq!(engine.plan(&filters.clone()).len(), 0);
    }

    #[test]
    fn age_lens_round_trip_is_one_dispatch_per_view() {
        let mut engine = engine();
        let filters = Filters::default();
        assert_eq!(engine.plan(&filters).len(), 5);

        let toggled = filters.apply(&FilterPatch {
            age_lens: Some(AgeLens::All),
            ..Default::default()
        });
        assert_eq!(engine.plan(&toggled).len(), 0);

        let back = toggled.apply(&FilterPatch {
            age_lens: Some(AgeLens::WorkingAge),
            ..Default::default()
        });
        assert_eq!(engine.plan(&back).len(), 0);
    }

    #[test]
    fn preset_change_redispatches_everything() {
        let mut engine = engine();
        let filters = Filters::default();
        engine.plan(&filters);

        let widened = filters.apply(&FilterPatch {
            preset: Some(TimePreset::OneYear),
            ..Default::default()
        });
        assert_eq!(engine.plan(&widened).len(), 5);
    }

    #[test]
    fn granularity_change_only_touches_timeseries() {
        let mut engine = engine();
        let filters = Filters::default();
        engine.plan(&filters);

        let regrouped = filters.apply(&FilterPatch {
            granularity: Some(crate::state::filters::Granularity::Quarterly),
            ..Default::default()
        });
        let dispatches = engine.plan(&regrouped);
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].0, View::Timeseries);
    }

    #[test]
    fn invalid_custom_window_dispatches_nothing() {
        let mut engine = engine();
        let filters = Filters {
            preset: TimePreset::Custom,
            start: Some(date("2024-01-01")),
            end: Some(date("2023-12-01")),
            ..Filters::default()
        };
        assert!(engine.plan(&filters).is_empty());

        // Dates fixed up: normal dispatch resumes.
        let fixed = Filters {
            end: Some(date("2024-02-01")),
            ..filters
        };
        assert_eq!(engine.plan(&fixed).len(), 5);
    }

    #[test]
    fn geography_cascade_reaches_state_level_map_tuple() {
        let mut engine = engine();
        let filters = Filters::default()
            .apply(&FilterPatch {
                state: Some(Some("Kerala".into())),
                ..Default::default()
            })
            .apply(&FilterPatch {
                district: Some(Some("Ernakulam".into())),
                ..Default::default()
            })
            .apply(&FilterPatch {
                state: Some(None),
                ..Default::default()
            });
        engine.plan(&filters);

        assert_eq!(filters.district, None);
        let map_key = engine.map_key().unwrap();
        assert_eq!(map_key.level, Some(DetailLevel::State));
        assert_eq!(map_key.state, None);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut engine = engine();
        let first = Filters::default();
        engine.plan(&first);
        let stale_key = base_params(&first);

        let second = first.apply(&FilterPatch {
            preset: Some(TimePreset::OneYear),
            ..Default::default()
        });
        engine.plan(&second);

        engine.deliver(Envelope {
            view: View::Summary,
            key: stale_key,
            payload: Ok(Payload::Summary(summary_payload())),
        });
        assert!(engine.summary().is_pending());

        engine.deliver(Envelope {
            view: View::Summary,
            key: base_params(&second),
            payload: Ok(Payload::Summary(summary_payload())),
        });
        assert!(engine.summary().data().is_some());
    }

    #[test]
    fn failure_is_isolated_and_cleared_by_next_change() {
        let mut engine = engine();
        let filters = Filters::default();
        engine.plan(&filters);

        engine.deliver(Envelope {
            view: View::Summary,
            key: base_params(&filters),
            payload: Err("connection refused".into()),
        });
        assert_eq!(engine.summary().error(), Some("connection refused"));
        assert!(engine.timeseries().is_pending());

        let next = filters.apply(&FilterPatch {
            preset: Some(TimePreset::OneMonth),
            ..Default::default()
        });
        engine.plan(&next);
        assert!(engine.summary().is_pending());
    }

    #[test]
    fn loading_clears_once_all_views_settle() {
        let mut engine = engine();
        let filters = Filters::default();
        engine.plan(&filters);
        assert!(engine.loading());

        let base = base_params(&filters);
        engine.deliver(Envelope {
            view: View::Summary,
            key: base.clone(),
            payload: Ok(Payload::Summary(summary_payload())),
        });
        engine.deliver(Envelope {
            view: View::Timeseries,
            key: timeseries_params(&filters),
            payload: Ok(Payload::Timeseries(Vec::new())),
        });
        engine.deliver(Envelope {
            view: View::Map,
            key: map_params(&filters),
            payload: Ok(Payload::Map(Vec::new())),
        });
        engine.deliver(Envelope {
            view: View::Comparisons,
            key: base.clone(),
            payload: Ok(Payload::Comparisons(ComparisonsResponse {
                states: Vec::new(),
                scatter: Vec::new(),
            })),
        });
        assert!(engine.loading());

        engine.deliver(Envelope {
            view: View::Insights,
            key: base,
            payload: Err("boom".into()),
        });
        assert!(!engine.loading());
    }
}
