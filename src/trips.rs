//! Synthetic trip generation.
//!
//! Trips are drawn from a fixed catalog of stations over a seven day window,
//! with start hours weighted toward the morning and evening commute.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::error::{ReportError, Result};

pub static STATIONS: [&str; 10] = [
    "Union Square",
    "Harbor Point",
    "City Hall",
    "Riverside Park",
    "Central Station",
    "Market Street",
    "University Ave",
    "Museum District",
    "Tech Campus",
    "Old Town",
];

/// Start hours the generator can emit and their relative weights.
pub static HOUR_WEIGHTS: &[(u32, u32)] = &[
    (8, 4),
    (9, 3),
    (12, 1),
    (13, 1),
    (14, 1),
    (17, 4),
    (18, 3),
    (20, 1),
    (21, 1),
];

pub const RUSH_HOURS: [u32; 4] = [8, 9, 17, 18];

/// Probability that a trip ends somewhere other than where it started.
pub const P_OTHER_END_STATION: f64 = 0.85;

pub const WINDOW_DAYS: u64 = 7;

pub fn is_rush_hour(hour: u32) -> bool {
    RUSH_HOURS.contains(&hour)
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// First day of the default window, a Monday.
pub fn default_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub trip_id: u64,
    pub start_station: &'static str,
    pub end_station: &'static str,
    pub started_at: NaiveDateTime,
    pub duration_min: f64,
}

/// Duration buckets, each a closed range sampled in half-minute steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    WeekdayRush,
    WeekdayOffPeak,
    Weekend,
}

impl DurationPolicy {
    pub fn for_slot(day: Weekday, hour: u32) -> Self {
        if is_weekend(day) {
            DurationPolicy::Weekend
        } else if is_rush_hour(hour) {
            DurationPolicy::WeekdayRush
        } else {
            DurationPolicy::WeekdayOffPeak
        }
    }

    /// Inclusive `(min, max)` bounds in minutes.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            DurationPolicy::WeekdayRush => (6.0, 18.0),
            DurationPolicy::WeekdayOffPeak => (5.0, 25.0),
            DurationPolicy::Weekend => (8.0, 35.0),
        }
    }

    pub fn sample<R: Rng>(self, rng: &mut R) -> f64 {
        let (min, max) = self.bounds();
        let steps = ((max - min) * 2.0) as u32;
        min + rng.random_range(0..=steps) as f64 * 0.5
    }
}

/// Seeded trip generator.
///
/// The same seed and settings always produce the same sequence of trips.
pub struct TripGenerator {
    seed: u64,
    days: Vec<NaiveDate>,
    hour_weights: Vec<(u32, u32)>,
    hour_index: WeightedIndex<u32>,
}

impl TripGenerator {
    pub fn new(seed: u64) -> Result<Self> {
        Self::build(seed, default_window_start(), WINDOW_DAYS, HOUR_WEIGHTS)
    }

    /// Replaces the start-hour table. Hours must be below 24 and at least one
    /// weight must be positive.
    pub fn with_hour_weights(self, weights: &[(u32, u32)]) -> Result<Self> {
        let start = self.days[0];
        Self::build(self.seed, start, self.days.len() as u64, weights)
    }

    /// Replaces the date window with `days` consecutive days from `start`.
    pub fn with_window(self, start: NaiveDate, days: u64) -> Result<Self> {
        Self::build(self.seed, start, days, &self.hour_weights)
    }

    fn build(seed: u64, start: NaiveDate, days: u64, weights: &[(u32, u32)]) -> Result<Self> {
        if days == 0 {
            return Err(ReportError::InvalidInput(
                "date window must span at least one day".into(),
            ));
        }
        if let Some((hour, _)) = weights.iter().find(|(hour, _)| *hour >= 24) {
            return Err(ReportError::InvalidInput(format!(
                "hour {hour} is outside 0..24"
            )));
        }

        let days = (0..days)
            .map(|offset| {
                start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                    ReportError::InvalidInput(format!("date window overflows at {start} + {offset}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let hour_index = WeightedIndex::new(weights.iter().map(|(_, weight)| *weight))
            .map_err(|e| ReportError::InvalidInput(format!("invalid hour weights: {e}")))?;

        Ok(Self {
            seed,
            days,
            hour_weights: weights.to_vec(),
            hour_index,
        })
    }

    /// Generates `count` trips with ids `1..=count`.
    #[tracing::instrument(skip(self), fields(seed = self.seed))]
    pub fn generate(&self, count: usize) -> Result<Vec<Trip>> {
        if count < 1 {
            return Err(ReportError::InvalidInput(format!(
                "trip count must be at least 1, got {count}"
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trips = Vec::new();
        trips.try_reserve_exact(count).map_err(|e| {
            ReportError::InvalidInput(format!("cannot hold {count} trips in memory: {e}"))
        })?;

        for trip_id in 1..=count as u64 {
            trips.push(self.next_trip(&mut rng, trip_id)?);
        }

        debug!(count = trips.len(), "Synthetic trips generated");
        Ok(trips)
    }

    fn next_trip(&self, rng: &mut StdRng, trip_id: u64) -> Result<Trip> {
        let start = rng.random_range(0..STATIONS.len());
        let day = self.days[rng.random_range(0..self.days.len())];
        let (hour, _) = self.hour_weights[self.hour_index.sample(rng)];
        let minute = rng.random_range(0..60);
        let second = rng.random_range(0..60);

        let end = if rng.random_bool(P_OTHER_END_STATION) {
            // pick among the other nine stations
            let other = rng.random_range(0..STATIONS.len() - 1);
            if other >= start { other + 1 } else { other }
        } else {
            start
        };

        let duration_min = DurationPolicy::for_slot(day.weekday(), hour).sample(rng);

        let started_at = day.and_hms_opt(hour, minute, second).ok_or_else(|| {
            ReportError::InvalidInput(format!("invalid time {hour}:{minute}:{second}"))
        })?;

        Ok(Trip {
            trip_id,
            start_station: STATIONS[start],
            end_station: STATIONS[end],
            started_at,
            duration_min,
        })
    }
}
