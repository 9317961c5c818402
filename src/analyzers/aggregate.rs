use crate::analyzers::types::{DayHourAggregate, HourlyAggregate, StationAggregate};
use crate::analyzers::utility::ratio;
use crate::features::FeaturedTrip;
use chrono::Weekday;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Running totals for one start station.
#[derive(Default)]
struct StationAccumulator<'a> {
    station: &'a str,
    trips: usize,
    duration_sum: f64,
    rush_trips: usize,
}

/// Groups trips by start station.
///
/// Rows are ordered by trip count, descending. Stations with equal counts
/// keep the order in which they were first seen in `trips`.
pub fn aggregate_by_station(trips: &[FeaturedTrip]) -> Vec<StationAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<StationAccumulator> = Vec::new();

    for t in trips {
        let station = t.trip.start_station;
        let slot = *index.entry(station).or_insert_with(|| {
            groups.push(StationAccumulator {
                station,
                ..Default::default()
            });
            groups.len() - 1
        });

        let acc = &mut groups[slot];
        acc.trips += 1;
        acc.duration_sum += t.trip.duration_min;
        if t.is_rush {
            acc.rush_trips += 1;
        }
    }

    let mut rows: Vec<StationAggregate> = groups
        .into_iter()
        .map(|acc| StationAggregate {
            station: acc.station.to_string(),
            trips: acc.trips,
            avg_duration: ratio(acc.duration_sum, acc.trips),
            rush_share: ratio(acc.rush_trips as f64, acc.trips),
            rush_score: None,
        })
        .collect();

    // stable, so ties stay in discovery order
    rows.sort_by(|a, b| b.trips.cmp(&a.trips));
    rows
}

/// Counts trips per start hour, ascending by hour.
pub fn aggregate_by_hour(trips: &[FeaturedTrip]) -> Vec<HourlyAggregate> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for t in trips {
        *counts.entry(t.hour).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(hour, trips)| HourlyAggregate { hour, trips })
        .collect()
}

/// Counts trips per (weekday, hour), ordered Monday..Sunday then by hour.
pub fn aggregate_by_day_hour(trips: &[FeaturedTrip]) -> Vec<DayHourAggregate> {
    let mut counts: HashMap<(Weekday, u32), usize> = HashMap::new();
    for t in trips {
        *counts.entry((t.dow, t.hour)).or_default() += 1;
    }

    let mut rows: Vec<DayHourAggregate> = counts
        .into_iter()
        .map(|((dow, hour), trips)| DayHourAggregate { dow, hour, trips })
        .collect();
    rows.sort_by_key(|r| (r.dow.number_from_monday(), r.hour));
    rows
}

/// The three grouped views over one trip collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub stations: Vec<StationAggregate>,
    pub hourly: Vec<HourlyAggregate>,
    pub day_hour: Vec<DayHourAggregate>,
}

impl Aggregates {
    #[tracing::instrument(skip_all, fields(trips = trips.len()))]
    pub fn compute(trips: &[FeaturedTrip]) -> Self {
        let aggregates = Aggregates {
            stations: aggregate_by_station(trips),
            hourly: aggregate_by_hour(trips),
            day_hour: aggregate_by_day_hour(trips),
        };

        debug!(
            stations = aggregates.stations.len(),
            hours = aggregates.hourly.len(),
            day_hour_slots = aggregates.day_hour.len(),
            "Aggregation complete"
        );

        aggregates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive_features;
    use crate::trips::{Trip, TripGenerator};
    use chrono::NaiveDate;

    fn trip(id: u64, station: &'static str, day: u32, hour: u32, duration_min: f64) -> Trip {
        Trip {
            trip_id: id,
            start_station: station,
            end_station: "Old Town",
            started_at: NaiveDate::from_ymd_opt(2025, 9, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            duration_min,
        }
    }

    fn sample_trips() -> Vec<Trip> {
        vec![
            trip(1, "City Hall", 1, 8, 10.0),
            trip(2, "Tech Campus", 1, 13, 20.0),
            trip(3, "City Hall", 2, 17, 14.0),
            trip(4, "Tech Campus", 6, 8, 30.0),
            trip(5, "Old Town", 7, 21, 9.0),
            trip(6, "City Hall", 7, 21, 12.0),
        ]
    }

    #[test]
    fn test_by_station_counts_and_means() {
        let trips = sample_trips();
        let features = derive_features(&trips);
        let rows = aggregate_by_station(&features);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].station, "City Hall");
        assert_eq!(rows[0].trips, 3);
        assert_eq!(rows[0].avg_duration, 12.0);
        assert!((rows[0].rush_share - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(rows[0].rush_score, None);

        assert_eq!(rows[1].station, "Tech Campus");
        assert_eq!(rows[1].avg_duration, 25.0);
        assert_eq!(rows[1].rush_share, 0.5);
    }

    #[test]
    fn test_by_station_ties_keep_discovery_order() {
        let trips = vec![
            trip(1, "Market Street", 1, 8, 10.0),
            trip(2, "Harbor Point", 1, 9, 10.0),
            trip(3, "Union Square", 1, 9, 10.0),
        ];
        let features = derive_features(&trips);
        let names: Vec<_> = aggregate_by_station(&features)
            .into_iter()
            .map(|r| r.station)
            .collect();

        assert_eq!(names, vec!["Market Street", "Harbor Point", "Union Square"]);
    }

    #[test]
    fn test_by_hour_sorted_ascending() {
        let trips = sample_trips();
        let features = derive_features(&trips);
        let rows = aggregate_by_hour(&features);

        assert_eq!(
            rows,
            vec![
                HourlyAggregate { hour: 8, trips: 2 },
                HourlyAggregate { hour: 13, trips: 1 },
                HourlyAggregate { hour: 17, trips: 1 },
                HourlyAggregate { hour: 21, trips: 2 },
            ]
        );
    }

    #[test]
    fn test_by_day_hour_week_order() {
        let trips = sample_trips();
        let features = derive_features(&trips);
        let rows = aggregate_by_day_hour(&features);

        let keys: Vec<_> = rows.iter().map(|r| (r.dow, r.hour, r.trips)).collect();
        assert_eq!(
            keys,
            vec![
                (Weekday::Mon, 8, 1),
                (Weekday::Mon, 13, 1),
                (Weekday::Tue, 17, 1),
                (Weekday::Sat, 8, 1),
                (Weekday::Sun, 21, 2),
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_aggregates() {
        let aggregates = Aggregates::compute(&[]);

        assert!(aggregates.stations.is_empty());
        assert!(aggregates.hourly.is_empty());
        assert!(aggregates.day_hour.is_empty());
    }

    #[test]
    fn test_totals_match_trip_count() {
        let trips = TripGenerator::new(42).unwrap().generate(20_000).unwrap();
        let features = derive_features(&trips);
        let aggregates = Aggregates::compute(&features);

        let by_station: usize = aggregates.stations.iter().map(|r| r.trips).sum();
        let by_hour: usize = aggregates.hourly.iter().map(|r| r.trips).sum();
        let by_slot: usize = aggregates.day_hour.iter().map(|r| r.trips).sum();

        assert_eq!(by_station, 20_000);
        assert_eq!(by_hour, 20_000);
        assert_eq!(by_slot, 20_000);
    }

    #[test]
    fn test_compute_is_repeatable() {
        let trips = TripGenerator::new(8).unwrap().generate(5_000).unwrap();
        let features = derive_features(&trips);

        assert_eq!(Aggregates::compute(&features), Aggregates::compute(&features));
    }
}
