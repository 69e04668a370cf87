//! Report generation.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report, write_report};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Center, MultiRadiusReport};

/// Run metadata shown at the top of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub center: Center,
    pub radii: Vec<f64>,
    /// Area units in the loaded index.
    pub units_in_index: usize,
    pub duration_seconds: f64,
}

/// A finished analysis ready to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub analysis: MultiRadiusReport,
}
