//! Output formatting and persistence for report results.
//!
//! Supports console tables, CSV export, and a JSON summary.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc, Weekday};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::StationAggregate;
use crate::error::Result;
use crate::features::{FeaturedTrip, serialize_weekday};

/// Writes the first `top_k` station rows as an aligned text table.
///
/// The `rush_score` column is included when `with_score` is set.
pub fn print_table<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[StationAggregate],
    top_k: usize,
    with_score: bool,
) -> Result<()> {
    writeln!(out, "{title}")?;

    write!(
        out,
        "{:<18} {:>10} {:>13} {:>11}",
        "station", "trips", "avg_duration", "rush_share"
    )?;
    if with_score {
        write!(out, " {:>11}", "rush_score")?;
    }
    writeln!(out)?;

    for row in rows.iter().take(top_k) {
        write!(
            out,
            "{:<18} {:>10} {:>13.2} {:>11.3}",
            row.station, row.trips, row.avg_duration, row.rush_share
        )?;
        if with_score {
            write!(out, " {:>11.2}", row.rush_score.unwrap_or(0.0))?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    Ok(())
}

/// Writes `rows` to a CSV file at `path` with a header line, replacing any
/// existing file.
pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Flat CSV form of a featured trip.
#[derive(Debug, Serialize)]
pub struct TripRow<'a> {
    pub trip_id: u64,
    pub start_station: &'a str,
    pub end_station: &'a str,
    pub started_at: NaiveDateTime,
    pub duration_min: f64,
    pub day: NaiveDate,
    pub hour: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub dow: Weekday,
    pub is_rush: bool,
}

impl<'a> From<&FeaturedTrip<'a>> for TripRow<'a> {
    fn from(f: &FeaturedTrip<'a>) -> Self {
        TripRow {
            trip_id: f.trip.trip_id,
            start_station: f.trip.start_station,
            end_station: f.trip.end_station,
            started_at: f.trip.started_at,
            duration_min: f.trip.duration_min,
            day: f.day,
            hour: f.hour,
            dow: f.dow,
            is_rush: f.is_rush,
        }
    }
}

pub fn write_trips_csv(path: impl AsRef<Path>, trips: &[FeaturedTrip]) -> Result<()> {
    let rows: Vec<TripRow> = trips.iter().map(TripRow::from).collect();
    write_csv(path, &rows)
}

/// Machine-readable summary of one report run.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub seed: u64,
    pub stations: usize,
    pub top_by_volume: Vec<StationAggregate>,
    pub top_by_rush_score: Vec<StationAggregate>,
}

impl ReportSummary {
    pub fn new(
        count: usize,
        seed: u64,
        by_volume: &[StationAggregate],
        by_score: &[StationAggregate],
        top_k: usize,
    ) -> Self {
        ReportSummary {
            generated_at: Utc::now(),
            count,
            seed,
            stations: by_volume.len(),
            top_by_volume: by_volume.iter().take(top_k).cloned().collect(),
            top_by_rush_score: by_score.iter().take(top_k).cloned().collect(),
        }
    }
}

/// Writes the summary as pretty-printed JSON.
pub fn write_json(path: impl AsRef<Path>, summary: &ReportSummary) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::DayHourAggregate;
    use crate::features::derive_features;
    use crate::trips::TripGenerator;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn station(name: &str, trips: usize, score: Option<f64>) -> StationAggregate {
        StationAggregate {
            station: name.to_string(),
            trips,
            avg_duration: 12.25,
            rush_share: 0.5,
            rush_score: score,
        }
    }

    #[test]
    fn test_print_table_respects_top_k() {
        let rows = vec![
            station("City Hall", 30, None),
            station("Old Town", 20, None),
            station("Tech Campus", 10, None),
        ];
        let mut out = Vec::new();
        print_table(&mut out, "Top stations", &rows, 2, false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Top stations\n"));
        assert!(text.contains("City Hall"));
        assert!(text.contains("Old Town"));
        assert!(!text.contains("Tech Campus"));
        assert!(!text.contains("rush_score"));
    }

    #[test]
    fn test_print_table_with_score() {
        let rows = vec![station("City Hall", 30, Some(1.2345))];
        let mut out = Vec::new();
        print_table(&mut out, "By score", &rows, 8, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("rush_score"));
        assert!(text.contains("1.23"));
        assert!(text.contains("12.25"));
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let path = temp_path("bikeshare_report_test_slots.csv");
        let _ = fs::remove_file(&path);

        let rows = vec![
            DayHourAggregate {
                dow: Weekday::Mon,
                hour: 8,
                trips: 4,
            },
            DayHourAggregate {
                dow: Weekday::Sun,
                hour: 21,
                trips: 1,
            },
        ];
        write_csv(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["dow,hour,trips", "Monday,8,4", "Sunday,21,1"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_trips_csv() {
        let path = temp_path("bikeshare_report_test_trips.csv");
        let _ = fs::remove_file(&path);

        let trips = TripGenerator::new(1).unwrap().generate(25).unwrap();
        let features = derive_features(&trips);
        write_trips_csv(&path, &features).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 26);
        assert!(lines[0].starts_with("trip_id,start_station,end_station,started_at"));
        assert!(lines[1].starts_with("1,"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_summary() {
        let path = temp_path("bikeshare_report_test_summary.json");
        let _ = fs::remove_file(&path);

        let by_volume = vec![station("City Hall", 30, None), station("Old Town", 20, None)];
        let by_score = vec![station("Old Town", 20, Some(2.0))];
        let summary = ReportSummary::new(50, 7, &by_volume, &by_score, 1);
        write_json(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["count"], 50);
        assert_eq!(value["stations"], 2);
        assert_eq!(value["top_by_volume"].as_array().unwrap().len(), 1);
        assert_eq!(value["top_by_rush_score"][0]["station"], "Old Town");

        fs::remove_file(&path).unwrap();
    }
}
