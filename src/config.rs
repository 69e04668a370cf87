//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.radiusdemo.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisOptions;
use crate::cli::OutputFormat;
use crate::spatial::DEFAULT_RADII;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".radiusdemo.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report file path. Without an extension, one matching the output
    /// format is appended.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "radius_report".to_string()
}

/// Input file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// GeoJSON boundaries of the area units.
    #[serde(default)]
    pub units: Option<String>,

    /// Primary demographic table.
    #[serde(default)]
    pub demographics: Option<String>,

    /// Secondary rate table.
    #[serde(default)]
    pub rates: Option<String>,

    /// Feature property that holds the unit identifier.
    #[serde(default = "default_id_property")]
    pub id_property: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            units: None,
            demographics: None,
            rates: None,
            id_property: default_id_property(),
        }
    }
}

fn default_id_property() -> String {
    "GEOID".to_string()
}

/// Analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Radii in miles.
    #[serde(default = "default_radii")]
    pub radii: Vec<f64>,

    /// Years between the prior and current age snapshots.
    #[serde(default = "default_span_years")]
    pub snapshot_span_years: f64,

    /// Years to project the age cohorts forward.
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            radii: default_radii(),
            snapshot_span_years: default_span_years(),
            projection_years: default_projection_years(),
        }
    }
}

fn default_radii() -> Vec<f64> {
    DEFAULT_RADII.to_vec()
}

fn default_span_years() -> f64 {
    AnalysisOptions::default().snapshot_span_years
}

fn default_projection_years() -> u32 {
    AnalysisOptions::default().projection_years
}

impl AnalysisConfig {
    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            snapshot_span_years: self.snapshot_span_years,
            projection_years: self.projection_years,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref units) = args.units {
            self.data.units = Some(units.display().to_string());
        }
        if let Some(ref demographics) = args.demographics {
            self.data.demographics = Some(demographics.display().to_string());
        }
        if let Some(ref rates) = args.rates {
            self.data.rates = Some(rates.display().to_string());
        }
        if let Some(ref id_property) = args.id_property {
            self.data.id_property = id_property.clone();
        }

        if let Some(ref radii) = args.radii {
            self.analysis.radii = radii.clone();
        }
        if let Some(span) = args.span_years {
            self.analysis.snapshot_span_years = span;
        }
        if let Some(years) = args.projection_years {
            self.analysis.projection_years = years;
        }
    }

    /// Report path for `format`, with the format's extension when the
    /// configured path has none.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        let mut path = PathBuf::from(&self.general.output);
        if path.extension().is_none() {
            path.set_extension(format.extension());
        }
        path
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
