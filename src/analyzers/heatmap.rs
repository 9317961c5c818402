//! Dense weekday x hour matrix for the heatmap chart.

use chrono::Weekday;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::analyzers::types::DayHourAggregate;
use crate::features::{WEEK, weekday_name};

/// Trip counts with one row per weekday (Monday first) and one column per
/// hour observed in the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapMatrix {
    pub hours: Vec<u32>,
    pub cells: Vec<Vec<usize>>,
}

impl HeatmapMatrix {
    /// Pivots the day x hour aggregate. Slots that never occur are 0.
    pub fn from_day_hour(rows: &[DayHourAggregate]) -> Self {
        let hours: Vec<u32> = rows
            .iter()
            .map(|r| r.hour)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![vec![0; hours.len()]; WEEK.len()];
        for r in rows {
            let row = r.dow.num_days_from_monday() as usize;
            // hours was built from these rows, so the lookup always hits
            if let Ok(col) = hours.binary_search(&r.hour) {
                cells[row][col] += r.trips;
            }
        }

        HeatmapMatrix { hours, cells }
    }

    pub fn get(&self, day: Weekday, hour: u32) -> usize {
        match self.hours.binary_search(&hour) {
            Ok(col) => self.cells[day.num_days_from_monday() as usize][col],
            Err(_) => 0,
        }
    }

    pub fn row_labels(&self) -> Vec<&'static str> {
        WEEK.iter().map(|d| weekday_name(*d)).collect()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.hours.iter().map(|h| h.to_string()).collect()
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    pub fn max(&self) -> usize {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(dow: Weekday, hour: u32, trips: usize) -> DayHourAggregate {
        DayHourAggregate { dow, hour, trips }
    }

    #[test]
    fn test_pivot_shape_and_cells() {
        let rows = vec![
            slot(Weekday::Mon, 8, 5),
            slot(Weekday::Wed, 17, 3),
            slot(Weekday::Sun, 12, 2),
        ];
        let m = HeatmapMatrix::from_day_hour(&rows);

        assert_eq!(m.hours, vec![8, 12, 17]);
        assert_eq!(m.cells.len(), 7);
        assert!(m.cells.iter().all(|row| row.len() == 3));

        assert_eq!(m.get(Weekday::Mon, 8), 5);
        assert_eq!(m.get(Weekday::Wed, 17), 3);
        assert_eq!(m.get(Weekday::Sun, 12), 2);
        assert_eq!(m.get(Weekday::Tue, 8), 0);
        assert_eq!(m.get(Weekday::Mon, 3), 0);
        assert_eq!(m.total(), 10);
        assert_eq!(m.max(), 5);
    }

    #[test]
    fn test_pivot_empty() {
        let m = HeatmapMatrix::from_day_hour(&[]);

        assert!(m.hours.is_empty());
        assert_eq!(m.cells.len(), 7);
        assert_eq!(m.total(), 0);
        assert_eq!(m.max(), 0);
    }

    #[test]
    fn test_labels() {
        let m = HeatmapMatrix::from_day_hour(&[slot(Weekday::Fri, 9, 1), slot(Weekday::Fri, 18, 1)]);

        assert_eq!(m.row_labels()[0], "Monday");
        assert_eq!(m.row_labels()[6], "Sunday");
        assert_eq!(m.column_labels(), vec!["9", "18"]);
    }
}
