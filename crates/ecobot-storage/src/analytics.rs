//! Dashboard analytics over fetched records.
//!
//! Everything here is pure and runs on records already returned by a
//! [`RecordStore`](crate::records::RecordStore).

use ecobot_core::types::{EnvironmentalRecord, RecordStatus, RecordType};

/// Number of records shown per type on a dashboard card.
pub const CARD_PREVIEW_LEN: usize = 3;

// =============================================================================
// Status gauge
// =============================================================================

/// Position of a value within its status band, as a 0..=100 fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusGauge {
    pub status: RecordStatus,
    pub percent: f64,
}

impl StatusGauge {
    fn new(status: RecordStatus, percent: f64) -> Self {
        Self { status, percent }
    }
}

/// Classify `value` into a status band for `record_type` and report how far
/// into that band it sits.
///
/// Air and temperature grow worse upward; water quality grows worse downward.
/// Hazardous always reports a full gauge.
pub fn status_progress(value: f64, record_type: RecordType) -> StatusGauge {
    match record_type {
        RecordType::Air => {
            if value <= 50.0 {
                StatusGauge::new(RecordStatus::Good, value / 50.0 * 100.0)
            } else if value <= 100.0 {
                StatusGauge::new(RecordStatus::Moderate, (value - 50.0) / 50.0 * 100.0)
            } else if value <= 150.0 {
                StatusGauge::new(RecordStatus::Poor, (value - 100.0) / 50.0 * 100.0)
            } else {
                StatusGauge::new(RecordStatus::Hazardous, 100.0)
            }
        }
        RecordType::Water => {
            if value >= 80.0 {
                StatusGauge::new(RecordStatus::Good, (value - 80.0) / 20.0 * 100.0)
            } else if value >= 50.0 {
                StatusGauge::new(RecordStatus::Moderate, (value - 50.0) / 30.0 * 100.0)
            } else if value >= 20.0 {
                StatusGauge::new(RecordStatus::Poor, (value - 20.0) / 30.0 * 100.0)
            } else {
                StatusGauge::new(RecordStatus::Hazardous, 100.0)
            }
        }
        RecordType::Temperature => {
            if value <= 25.0 {
                StatusGauge::new(RecordStatus::Good, value / 25.0 * 100.0)
            } else if value <= 32.0 {
                StatusGauge::new(RecordStatus::Moderate, (value - 25.0) / 7.0 * 100.0)
            } else if value <= 40.0 {
                StatusGauge::new(RecordStatus::Poor, (value - 32.0) / 8.0 * 100.0)
            } else {
                StatusGauge::new(RecordStatus::Hazardous, 100.0)
            }
        }
    }
}

// =============================================================================
// Alerts and filters
// =============================================================================

/// Records whose stored status is poor or hazardous.
///
/// Grouped by type in [`RecordType::ALL`] order (air, water, temperature);
/// within a type the input order is kept, so newest-first input stays
/// newest-first per type.
pub fn critical_alerts(records: &[EnvironmentalRecord]) -> Vec<&EnvironmentalRecord> {
    RecordType::ALL
        .iter()
        .flat_map(|&record_type| {
            records
                .iter()
                .filter(move |r| r.record_type == record_type && r.status.is_critical())
        })
        .collect()
}

/// Location search plus optional weekday selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub search: String,
    /// `None` means every day.
    pub day: Option<String>,
}

impl DashboardFilter {
    pub fn matches(&self, record: &EnvironmentalRecord) -> bool {
        let needle = self.search.to_lowercase();
        if !record.location.to_lowercase().contains(&needle) {
            return false;
        }
        match &self.day {
            None => true,
            // Records without a stored weekday never match a selected day.
            Some(day) => record
                .day_of_week
                .as_deref()
                .is_some_and(|d| d.to_lowercase() == day.to_lowercase()),
        }
    }

    pub fn apply<'a>(&self, records: &'a [EnvironmentalRecord]) -> Vec<&'a EnvironmentalRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

// =============================================================================
// Charts and summary
// =============================================================================

/// One bar in a per-type chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Bar series of `record_type` values labelled by location.
pub fn chart_series(records: &[&EnvironmentalRecord], record_type: RecordType) -> Vec<ChartPoint> {
    records
        .iter()
        .filter(|r| r.record_type == record_type)
        .map(|r| ChartPoint {
            label: r.location.clone(),
            value: r.value,
        })
        .collect()
}

/// Per-type slice of the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSummary {
    pub record_type: RecordType,
    /// Up to [`CARD_PREVIEW_LEN`] filtered records, in input order.
    pub preview: Vec<EnvironmentalRecord>,
    pub series: Vec<ChartPoint>,
}

/// Dashboard view: per-type cards and charts after filtering, plus the
/// unfiltered alert list.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub types: Vec<TypeSummary>,
    pub alerts: Vec<EnvironmentalRecord>,
}

impl DashboardSummary {
    pub fn build(records: &[EnvironmentalRecord], filter: &DashboardFilter) -> Self {
        let filtered = filter.apply(records);
        let types = RecordType::ALL
            .iter()
            .map(|&record_type| TypeSummary {
                record_type,
                preview: filtered
                    .iter()
                    .filter(|r| r.record_type == record_type)
                    .take(CARD_PREVIEW_LEN)
                    .map(|r| (*r).clone())
                    .collect(),
                series: chart_series(&filtered, record_type),
            })
            .collect();

        Self {
            types,
            alerts: critical_alerts(records).into_iter().cloned().collect(),
        }
    }
}
