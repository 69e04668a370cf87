//! National benchmark rates.
//!
//! The rate table replicates the same national values on every row. They
//! are read once per call from the first classified unit that carries a
//! positive national labor-force value; when none does, hardcoded
//! benchmarks are used.

use serde::{Deserialize, Serialize};

use super::stats::round_to;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::models::RateMetric;
use crate::store::RateTable;

/// Hardcoded national benchmarks, indexed by [`RateMetric::index`].
pub const FALLBACK_BENCHMARKS: [f64; 5] = [63.4, 3.7, 33.7, 88.5, 38.2];

/// National benchmark per rate metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NationalBenchmarks {
    values: [f64; 5],
    captured: bool,
}

impl Default for NationalBenchmarks {
    fn default() -> Self {
        Self::fallback()
    }
}

impl NationalBenchmarks {
    /// The hardcoded benchmarks.
    pub fn fallback() -> Self {
        Self {
            values: FALLBACK_BENCHMARKS,
            captured: false,
        }
    }

    /// Capture benchmarks from the rate rows of `identifiers`.
    ///
    /// Table values win over the hardcoded ones when captured; each
    /// non-positive table value falls back individually. Captured values are
    /// rounded to one decimal.
    pub fn capture(
        rates: Option<&RateTable>,
        identifiers: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let source = rates.and_then(|table| {
            identifiers
                .iter()
                .filter_map(|id| table.get(id))
                .find(|row| row.national(RateMetric::LaborForceParticipation) > 0.0)
        });

        let Some(row) = source else {
            diagnostics.record(
                DiagnosticKind::BenchmarkFallback,
                None,
                "no national benchmarks in rate table; using hardcoded values",
            );
            return Self::fallback();
        };

        let mut values = FALLBACK_BENCHMARKS;
        for metric in RateMetric::ALL {
            let national = row.national(metric);
            if national > 0.0 {
                values[metric.index()] = round_to(national, 1);
            }
        }
        Self {
            values,
            captured: true,
        }
    }

    pub fn get(&self, metric: RateMetric) -> f64 {
        self.values[metric.index()]
    }

    /// True when the values came from the rate table.
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}
