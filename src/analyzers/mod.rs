//! Trip aggregation and station ranking.
//!
//! This module groups featured trips by station, hour, and weekday x hour,
//! pivots the weekday x hour counts into a heatmap matrix, and ranks
//! stations by rush score.

pub mod aggregate;
pub mod heatmap;
pub mod score;
pub mod types;
pub mod utility;
