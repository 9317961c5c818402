use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

pub const DEFAULT_COUNT: usize = 2_000_000;
pub const DEFAULT_SEED: u64 = 7;
pub const DEFAULT_TOP_K: usize = 8;
pub const DEFAULT_OUTPUT: &str = "bikeshare_report.png";

/// Run parameters for a report.
///
/// Can be stored as a JSON object on disk; missing keys take their defaults:
/// ```json
/// { "count": 100000, "seed": 42, "output": "out/report.png" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of synthetic trips to generate.
    pub count: usize,
    pub seed: u64,
    /// Rows shown in each console ranking.
    pub top_k: usize,
    /// Where the chart image is written.
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            seed: DEFAULT_SEED,
            top_k: DEFAULT_TOP_K,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ReportConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count < 1 {
            return Err(ReportError::InvalidInput(format!(
                "count must be at least 1, got {}",
                self.count
            )));
        }
        if self.top_k < 1 {
            return Err(ReportError::InvalidInput(format!(
                "top_k must be at least 1, got {}",
                self.top_k
            )));
        }
        Ok(())
    }
}
