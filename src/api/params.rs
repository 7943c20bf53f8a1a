// src/api/params.rs
use chrono::NaiveDate;

use crate::state::filters::{Filters, Granularity, TimePreset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    State,
    District,
}

impl DetailLevel {
    pub fn as_param(&self) -> &'static str {
        match self {
            DetailLevel::State => "state",
            DetailLevel::District => "district",
        }
    }
}

// The resolved parameter tuple for one request. Equality on this struct is
// the dedup/re-fetch key for the query engine.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub preset: TimePreset,
    pub state: Option<String>,
    pub district: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub granularity: Option<Granularity>,
    pub level: Option<DetailLevel>,
}

// Geography, preset, and (for custom windows only) the explicit dates.
// Everything except the timeseries view uses this shape.
pub fn base_params(filters: &Filters) -> QueryParams {
    let custom = filters.preset == TimePreset::Custom;
    QueryParams {
        preset: filters.preset,
        state: filters.state.clone(),
        district: filters.district.clone(),
        start: if custom { filters.start } else { None },
        end: if custom { filters.end } else { None },
        granularity: None,
        level: None,
    }
}

pub fn timeseries_params(filters: &Filters) -> QueryParams {
    QueryParams {
        granularity: Some(filters.granularity),
        ..base_params(filters)
    }
}

pub fn map_params(filters: &Filters) -> QueryParams {
    QueryParams {
        level: Some(detail_level(filters)),
        ..base_params(filters)
    }
}

// Derived, never stored: recomputed from the current geography every time so
// the map level cannot drift from the state selection.
pub fn detail_level(filters: &Filters) -> DetailLevel {
    if filters.state.is_some() {
        DetailLevel::District
    } else {
        DetailLevel::State
    }
}

impl QueryParams {
    pub fn as_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("preset", self.preset.as_param().to_string())];
        if let Some(state) = &self.state {
            pairs.push(("state", state.clone()));
        }
        if let Some(district) = &self.district {
            pairs.push(("district", district.clone()));
        }
        if let Some(start) = self.start {
            pairs.push(("start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(granularity) = self.granularity {
            pairs.push(("granularity", granularity.as_param().to_string()));
        }
        if let Some(level) = self.level {
            pairs.push(("level", level.as_param().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filters::FilterPatch;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn non_custom_presets_never_emit_dates() {
        let filters = Filters {
            preset: TimePreset::SixMonths,
            start: Some(date("2024-01-01")),
            end: Some(date("2024-02-01")),
            ..Filters::default()
        };
        for params in [base_params(&filters), timeseries_params(&filters), map_params(&filters)] {
            assert_eq!(params.start, None);
            assert_eq!(params.end, None);
            let keys: Vec<&str> = params.as_query().into_iter().map(|(k, _)| k).collect();
            assert!(!keys.contains(&"start"));
            assert!(!keys.contains(&"end"));
        }
    }

    #[test]
    fn custom_preset_emits_dates() {
        let filters = Filters {
            preset: TimePreset::Custom,
            start: Some(date("2024-01-01")),
            end: Some(date("2024-02-01")),
            ..Filters::default()
        };
        let query = base_params(&filters).as_query();
        assert!(query.contains(&("start", "2024-01-01".to_string())));
        assert!(query.contains(&("end", "2024-02-01".to_string())));
    }

    #[test]
    fn granularity_only_on_timeseries() {
        let filters = Filters::default();
        assert_eq!(base_params(&filters).granularity, None);
        assert_eq!(map_params(&filters).granularity, None);
        assert_eq!(
            timeseries_params(&filters).granularity,
            Some(Granularity::Monthly)
        );
    }

    #[test]
    fn detail_level_follows_state_selection() {
        let mut filters = Filters::default();
        assert_eq!(detail_level(&filters), DetailLevel::State);

        filters.state = Some("Kerala".into());
        assert_eq!(detail_level(&filters), DetailLevel::District);
        assert_eq!(map_params(&filters).level, Some(DetailLevel::District));
    }

    #[test]
    fn clearing_state_drops_map_to_state_level() {
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

        assert_eq!(filters.district, None);
        let params = map_params(&filters);
        assert_eq!(params.level, Some(DetailLevel::State));
        assert_eq!(params.state, None);
        assert_eq!(params.district, None);
    }

    #[test]
    fn age_lens_is_absent_from_the_tuple() {
        use crate::state::filters::AgeLens;
        let base = Filters::default();
        let toggled = base.apply(&FilterPatch {
            age_lens: Some(AgeLens::All),
            ..Default::default()
        });
        assert_eq!(base_params(&base), base_params(&toggled));
        assert_eq!(timeseries_params(&base), timeseries_params(&toggled));
        assert_eq!(map_params(&base), map_params(&toggled));
    }
}
