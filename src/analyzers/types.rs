//! Data types produced by the aggregation pipeline.

use chrono::Weekday;
use serde::Serialize;

use crate::features::serialize_weekday;

/// Per-station summary of trips starting there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAggregate {
    pub station: String,
    pub trips: usize,
    pub avg_duration: f64,
    pub rush_share: f64,
    /// Set by [`crate::analyzers::score::rank_by_rush_score`].
    pub rush_score: Option<f64>,
}

/// Trip count for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyAggregate {
    pub hour: u32,
    pub trips: usize,
}

/// Trip count for one (weekday, hour) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayHourAggregate {
    #[serde(serialize_with = "serialize_weekday")]
    pub dow: Weekday,
    pub hour: u32,
    pub trips: usize,
}
