//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// radiusdemo - multi-radius demographic reports for a point
///
/// Classify census block groups into concentric radii around a location
/// and aggregate their demographics per radius. Markdown/JSON reports.
///
/// Examples:
///   radiusdemo --lat 32.7767 --lng -96.7970 --units bg.geojson --demographics acs.csv
///   radiusdemo --lat 32.7767 --lng -96.7970 --radii 1,3,5,10 --rates rates.csv --format json
///   radiusdemo --lat 32.7767 --lng -96.7970 --units bg.geojson --dry-run
///   radiusdemo --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Latitude of the center point in decimal degrees
    #[arg(
        long,
        value_name = "DEG",
        allow_hyphen_values = true,
        required_unless_present = "init_config"
    )]
    pub lat: Option<f64>,

    /// Longitude of the center point in decimal degrees
    #[arg(
        long,
        value_name = "DEG",
        allow_hyphen_values = true,
        required_unless_present = "init_config"
    )]
    pub lng: Option<f64>,

    /// Radii in miles (comma-separated)
    ///
    /// Example: --radii 1,3,5. Defaults to the config file, then 1,3,5.
    #[arg(short, long, value_name = "MILES", value_delimiter = ',')]
    pub radii: Option<Vec<f64>>,

    /// GeoJSON feature collection of area unit boundaries
    #[arg(short, long, value_name = "FILE", env = "RADIUSDEMO_UNITS")]
    pub units: Option<PathBuf>,

    /// Primary demographic table (comma-delimited)
    ///
    /// Without it every radius is estimated.
    #[arg(short, long, value_name = "FILE", env = "RADIUSDEMO_DEMOGRAPHICS")]
    pub demographics: Option<PathBuf>,

    /// Secondary rate table (comma-delimited)
    ///
    /// Without it local rates fall back to national benchmarks.
    #[arg(long, value_name = "FILE", env = "RADIUSDEMO_RATES")]
    pub rates: Option<PathBuf>,

    /// Feature property holding the unit identifier
    #[arg(long, value_name = "NAME")]
    pub id_property: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Years between the prior and current age snapshots
    #[arg(long, value_name = "YEARS")]
    pub span_years: Option<f64>,

    /// Years to project the age cohorts forward
    #[arg(long, value_name = "YEARS")]
    pub projection_years: Option<u32>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .radiusdemo.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: classify units and print radius membership without aggregating
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .radiusdemo.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for reports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Err("Both --lat and --lng are required".to_string());
        };

        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err("Latitude must be between -90 and 90".to_string());
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err("Longitude must be between -180 and 180".to_string());
        }

        if let Some(ref radii) = self.radii {
            if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
                return Err("Radii must be positive numbers of miles".to_string());
            }
        }

        if let Some(span) = self.span_years {
            if !span.is_finite() || span <= 0.0 {
                return Err("Snapshot span must be a positive number of years".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
