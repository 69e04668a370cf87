//! Analysis modules.
//!
//! The engine classifies units, builds canonical records for the union, and
//! folds each radius into a summary. Estimation, benchmarks, the age shift
//! and geography resolution live in their own modules.

pub mod aggregator;
pub mod benchmark;
pub mod engine;
pub mod estimate;
pub mod geography;
pub mod projection;
pub mod stats;

pub use aggregator::{aggregate_radius, RadiusAccumulator};
pub use benchmark::NationalBenchmarks;
pub use engine::{analyze, AnalysisOptions};
pub use estimate::estimate_for_radius;
pub use geography::resolve_geography;
pub use projection::project_age_shift;
