//! Multi-radius analysis: classify, build records, aggregate each radius.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::aggregator::aggregate_radius;
use super::benchmark::NationalBenchmarks;
use super::estimate::estimate_for_radius;
use super::geography::{area_median_income, resolve_geography};
use super::projection::project_age_shift;
use crate::context::DataContext;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::EngineError;
use crate::models::{Center, MultiRadiusReport};
use crate::spatial::classify;
use crate::store::{build_records, RecordMap};

/// Tunables for one analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Years between the prior and current age snapshots.
    pub snapshot_span_years: f64,
    /// Years to project the age cohorts forward.
    pub projection_years: u32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            snapshot_span_years: 5.0,
            projection_years: 5,
        }
    }
}

/// Run a full multi-radius analysis around `center`.
///
/// Fails only when the area unit index is missing or the center is not a
/// finite coordinate. A missing demographic table, an empty radius or an
/// empty union all fall back to estimated summaries, recorded in the
/// report's diagnostics.
pub fn analyze(
    ctx: &DataContext,
    center: Center,
    radii: &[f64],
    options: &AnalysisOptions,
) -> Result<MultiRadiusReport, EngineError> {
    let started = Instant::now();
    let units = ctx.units()?;
    let mut diagnostics = Diagnostics::new();

    let classification = classify(units, center, radii, &mut diagnostics)?;
    let union = &classification.all_identifiers;

    let records = match ctx.demographics() {
        Some(table) => Some(build_records(union, table, &mut diagnostics)),
        None => {
            diagnostics.record(
                DiagnosticKind::TableUnavailable,
                None,
                "demographic table not loaded; every radius is estimated",
            );
            None
        }
    };

    match ctx.rates() {
        Some(table) => {
            for id in union.iter().filter(|id| !table.contains(id)) {
                diagnostics.record(
                    DiagnosticKind::RateMiss,
                    Some(id),
                    "identifier not found in rate table",
                );
            }
        }
        None => diagnostics.record(
            DiagnosticKind::TableUnavailable,
            None,
            "rate table not loaded; national benchmarks stand in for local rates",
        ),
    }

    let benchmarks = match &records {
        Some(_) if !union.is_empty() => {
            NationalBenchmarks::capture(ctx.rates(), union, &mut diagnostics)
        }
        _ => NationalBenchmarks::fallback(),
    };

    let mut summaries = Vec::with_capacity(classification.by_radius.len());
    for members in &classification.by_radius {
        let summary = match &records {
            Some(records) if !members.identifiers.is_empty() => aggregate_radius(
                members.radius,
                &members.identifiers,
                records,
                ctx.rates(),
                &benchmarks,
            ),
            _ => {
                diagnostics.record(
                    DiagnosticKind::EstimatedRadius,
                    None,
                    format!("{}: no usable data; summary estimated", members.label),
                );
                estimate_for_radius(members.radius)
            }
        };
        debug!(
            "{}: {} members, population {}",
            summary.label, summary.member_count, summary.population
        );
        summaries.push(summary);
    }

    if let Some(largest) = summaries.last_mut() {
        largest.age_shift = Some(project_age_shift(
            &largest.age,
            &largest.age_prior,
            options.snapshot_span_years,
            options.projection_years,
        ));
    }

    let empty = RecordMap::new();
    let geography = union.first().map(|id| {
        resolve_geography(
            id,
            area_median_income(union, records.as_ref().unwrap_or(&empty)),
        )
    });

    info!(
        "Analysis complete: {} radii, {} units in union, {} diagnostics ({:.2}s)",
        summaries.len(),
        union.len(),
        diagnostics.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(MultiRadiusReport {
        center,
        radii: classification.radii(),
        union_count: union.len(),
        summaries,
        geography,
        diagnostics,
    })
}
