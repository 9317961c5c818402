//! Per-trip derived fields.

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::Serializer;

use crate::trips::{Trip, is_rush_hour};

/// Weekdays in report order, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) fn serialize_weekday<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

/// A trip together with the fields the aggregations group on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturedTrip<'a> {
    pub trip: &'a Trip,
    pub day: NaiveDate,
    pub hour: u32,
    pub dow: Weekday,
    pub is_rush: bool,
}

impl<'a> FeaturedTrip<'a> {
    pub fn from_trip(trip: &'a Trip) -> Self {
        let day = trip.started_at.date();
        let hour = trip.started_at.hour();
        FeaturedTrip {
            trip,
            day,
            hour,
            dow: day.weekday(),
            is_rush: is_rush_hour(hour),
        }
    }
}

#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn derive_features(trips: &[Trip]) -> Vec<FeaturedTrip<'_>> {
    trips.iter().map(FeaturedTrip::from_trip).collect()
}
