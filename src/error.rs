//! Error types shared by the report pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    /// Bad parameters: non-positive trip count, empty hour table, etc.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A station average duration of zero reached the scorer.
    #[error("Station {station} has an average duration of zero, cannot compute rush score")]
    DivisionByZero { station: String },

    /// The chart backend failed to draw or write the image.
    #[error("Render failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
