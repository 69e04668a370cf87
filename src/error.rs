//! Error types for the engine and its ingestion shell.

use std::io;
use thiserror::Error;

/// Hard failures surfaced to the caller of the engine.
///
/// Everything else (bad geometry, missing rows, empty radii) degrades
/// gracefully and is reported through [`crate::diagnostics::Diagnostics`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required index or table was never supplied to the context.
    #[error("{0} not loaded")]
    DataNotLoaded(&'static str),

    /// The query center is not a finite coordinate.
    #[error("Invalid center coordinate: lat={lat}, lng={lng}")]
    InvalidCenter { lat: f64, lng: f64 },
}

/// A unit geometry that cannot take part in predicate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// No polygon survived repair.
    #[error("geometry has no usable polygon after repair")]
    Empty,

    /// The geometry has no finite bounding box.
    #[error("geometry has no finite bounds")]
    Unbounded,
}

/// Errors raised while reading source files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid delimited text at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}
