//! EcoBot Storage crate - SQLite record store, community forum and
//! dashboard analytics.
//!
//! Provides a WAL-mode SQLite database holding environmental measurements
//! and forum discussions, repositories with the dashboard's filter/sort
//! queries, and pure helpers for status gauges, alerts and chart series.

pub mod analytics;
pub mod db;
pub mod forum;
pub mod migrations;
pub mod records;

pub use analytics::{
    chart_series, critical_alerts, status_progress, ChartPoint, DashboardFilter,
    DashboardSummary, StatusGauge, TypeSummary,
};
pub use db::Database;
pub use forum::{
    parse_tags, sample_posts, short_id, Forum, ForumQuery, ForumRepository, ForumSort,
    ForumStats, ForumStore, NewPost,
};
pub use records::{location_sort_key, RecordQuery, RecordRepository, RecordSort, RecordStore};
