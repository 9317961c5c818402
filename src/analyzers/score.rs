use crate::analyzers::types::StationAggregate;
use crate::error::{ReportError, Result};

/// `trips * rush_share / avg_duration`: favors busy, commute-heavy stations
/// with short rides.
pub fn rush_score(row: &StationAggregate) -> Result<f64> {
    if row.avg_duration == 0.0 {
        return Err(ReportError::DivisionByZero {
            station: row.station.clone(),
        });
    }
    Ok(row.trips as f64 * row.rush_share / row.avg_duration)
}

/// Returns a copy of `stations` with `rush_score` filled in, sorted by score
/// descending. Equal scores keep their input order.
pub fn rank_by_rush_score(stations: &[StationAggregate]) -> Result<Vec<StationAggregate>> {
    let mut ranked = stations
        .iter()
        .map(|row| {
            Ok(StationAggregate {
                rush_score: Some(rush_score(row)?),
                ..row.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ranked.sort_by(|a, b| {
        let a = a.rush_score.unwrap_or(0.0);
        let b = b.rush_score.unwrap_or(0.0);
        b.total_cmp(&a)
    });

    Ok(ranked)
}
