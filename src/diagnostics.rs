//! Structured diagnostics returned alongside results.
//!
//! Every non-fatal degradation (a skipped geometry, a missing row, an
//! estimated radius) is recorded here so callers and tests can inspect it
//! without parsing log output. Each event is also emitted through `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Why a unit was skipped or a value substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A feature had no usable identifier.
    MissingIdentifier,
    /// A unit's geometry could not be evaluated.
    InvalidGeometry,
    /// A classified identifier has no row in the demographic table.
    DemographicMiss,
    /// A classified identifier has no row in the rate table.
    RateMiss,
    /// A radius summary was synthesized by the estimation fallback.
    EstimatedRadius,
    /// National benchmarks were not found in the rate table.
    BenchmarkFallback,
    /// A whole table was not supplied.
    TableUnavailable,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::MissingIdentifier => "missing identifier",
            DiagnosticKind::InvalidGeometry => "invalid geometry",
            DiagnosticKind::DemographicMiss => "no demographic row",
            DiagnosticKind::RateMiss => "no rate row",
            DiagnosticKind::EstimatedRadius => "estimated radius",
            DiagnosticKind::BenchmarkFallback => "benchmark fallback",
            DiagnosticKind::TableUnavailable => "table unavailable",
        };
        write!(f, "{}", s)
    }
}

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub detail: String,
}

/// Ordered list of diagnostic events for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub events: Vec<DiagnosticEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and mirror it to the log.
    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        identifier: Option<&str>,
        detail: impl Into<String>,
    ) {
        let detail = detail.into();
        match kind {
            DiagnosticKind::InvalidGeometry | DiagnosticKind::TableUnavailable => {
                warn!(kind = %kind, identifier = identifier.unwrap_or("-"), "{}", detail)
            }
            _ => debug!(kind = %kind, identifier = identifier.unwrap_or("-"), "{}", detail),
        }
        self.events.push(DiagnosticEvent {
            kind,
            identifier: identifier.map(str::to_string),
            detail,
        });
    }

    /// Number of events of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Identifiers recorded under the given kind, in event order.
    pub fn identifiers(&self, kind: DiagnosticKind) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.identifier.as_deref())
            .collect()
    }

    /// Event counts per kind, sorted by kind.
    pub fn counts(&self) -> Vec<(DiagnosticKind, usize)> {
        let mut counts: std::collections::BTreeMap<DiagnosticKind, usize> = Default::default();
        for event in &self.events {
            *counts.entry(event.kind).or_default() += 1;
        }
        counts.into_iter().collect()
    }
}
