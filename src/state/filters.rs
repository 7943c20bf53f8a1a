// src/state/filters.rs
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePreset {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    Custom,
}

impl TimePreset {
    pub const ALL: [TimePreset; 5] = [
        TimePreset::OneMonth,
        TimePreset::ThreeMonths,
        TimePreset::SixMonths,
        TimePreset::OneYear,
        TimePreset::Custom,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            TimePreset::OneMonth => "1m",
            TimePreset::ThreeMonths => "3m",
            TimePreset::SixMonths => "6m",
            TimePreset::OneYear => "1y",
            TimePreset::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePreset::OneMonth => "Last Month",
            TimePreset::ThreeMonths => "Last 3 Months",
            TimePreset::SixMonths => "Last 6 Months",
            TimePreset::OneYear => "Last Year",
            TimePreset::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [
        Granularity::Monthly,
        Granularity::Quarterly,
        Granularity::Yearly,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Monthly => "Monthly",
            Granularity::Quarterly => "Quarterly",
            Granularity::Yearly => "Yearly",
        }
    }
}

// Display lens only; never sent to the API, so toggling it must not
// invalidate any query tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeLens {
    All,
    WorkingAge,
}

impl AgeLens {
    pub fn label(&self) -> &'static str {
        match self {
            AgeLens::All => "All Ages",
            AgeLens::WorkingAge => "18+ (Working Age)",
        }
    }
}

// The canonical filter selection. Snapshots are immutable: every change goes
// through apply(), which returns a fresh value and leaves the old one intact
// so callers can diff against retained copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    pub state: Option<String>,
    pub district: Option<String>,
    pub age_lens: AgeLens,
    pub preset: TimePreset,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub granularity: Granularity,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            state: None,
            district: None,
            age_lens: AgeLens::WorkingAge,
            preset: TimePreset::ThreeMonths,
            start: None,
            end: None,
            granularity: Granularity::Monthly,
        }
    }
}

// Partial update for Filters. Outer None = field untouched; inner None on the
// double-optional fields means "clear".
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub state: Option<Option<String>>,
    pub district: Option<Option<String>>,
    pub age_lens: Option<AgeLens>,
    pub preset: Option<TimePreset>,
    pub start: Option<Option<NaiveDate>>,
    pub end: Option<Option<NaiveDate>>,
    pub granularity: Option<Granularity>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.district.is_none()
            && self.age_lens.is_none()
            && self.preset.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.granularity.is_none()
    }
}

impl Filters {
    pub fn apply(&self, patch: &FilterPatch) -> Filters {
        let mut next = self.clone();

        if let Some(state) = &patch.state {
            // Moving to a different state (or clearing) invalidates the
            // district unless the patch names one itself.
            if *state != next.state && patch.district.is_none() {
                next.district = None;
            }
            next.state = state.clone();
        }
        if let Some(district) = &patch.district {
            next.district = district.clone();
        }
        if let Some(age_lens) = patch.age_lens {
            next.age_lens = age_lens;
        }
        if let Some(preset) = patch.preset {
            next.preset = preset;
        }
        if let Some(start) = patch.start {
            next.start = start;
        }
        if let Some(end) = patch.end {
            next.end = end;
        }
        if let Some(granularity) = patch.granularity {
            next.granularity = granularity;
        }

        next
    }

    // A custom window may be half-edited in the sidebar; queries must wait
    // until both dates exist and are ordered.
    pub fn window_ready(&self) -> bool {
        if self.preset != TimePreset::Custom {
            return true;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => false,
        }
    }

    pub fn scope_label(&self) -> String {
        match (&self.state, &self.district) {
            (Some(state), Some(district)) => format!("{}, {}", district, state),
            (Some(state), None) => format!("{} | Focus", state),
            _ => "National view".to_string(),
        }
    }
}
