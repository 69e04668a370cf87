//! Radius demographics engine.
//!
//! Classifies small census areas (block groups) into concentric radii
//! around a point and aggregates their demographic attributes per radius.
//!
//! ```no_run
//! use radiusdemo::analysis::{analyze, AnalysisOptions};
//! use radiusdemo::context::DataContext;
//! use radiusdemo::loader;
//! use radiusdemo::models::Center;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let units = loader::load_units(Path::new("bg.geojson"), "GEOID")?;
//! let ctx = DataContext::new()
//!     .with_units(units.index)
//!     .with_demographics(loader::load_demographics(Path::new("acs.csv"))?);
//! let report = analyze(
//!     &ctx,
//!     Center::new(32.7767, -96.7970),
//!     &[1.0, 3.0, 5.0],
//!     &AnalysisOptions::default(),
//! )?;
//! println!("{}", report.summaries[0].population);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod spatial;
pub mod store;
