//! Markdown report generation.
//!
//! This module renders a multi-radius analysis as a Markdown document with
//! one column per radius, or as pretty-printed JSON.

use super::{Report, ReportMetadata};
use crate::diagnostics::Diagnostics;
use crate::models::{
    AgeCohort, AgeShiftProjection, Geography, IncomeBracket, RadiusSummary, RateMetric, Series,
    Trend,
};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let analysis = &report.analysis;
    let mut output = String::new();

    output.push_str("# Radius Demographics Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    if let Some(geography) = &analysis.geography {
        output.push_str(&generate_geography_section(geography));
    }

    output.push_str(&generate_population_section(&analysis.summaries));
    output.push_str(&generate_age_section(&analysis.summaries));
    output.push_str(&generate_income_section(&analysis.summaries));
    output.push_str(&generate_housing_section(&analysis.summaries));
    output.push_str(&generate_employment_section(&analysis.summaries));
    output.push_str(&generate_projection_section(&analysis.summaries));

    if let Some(shift) = analysis.largest().and_then(|s| s.age_shift.as_ref()) {
        output.push_str(&generate_age_shift_section(shift));
    }

    output.push_str(&generate_diagnostics_section(&analysis.diagnostics));
    output.push_str(&generate_footer());

    output
}

/// Whole number with thousands separators.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_count(value))
}

fn format_signed_percent(value: f64) -> String {
    format!("{:+.1}%", value)
}

/// Header row and alignment row for a table with one column per radius.
fn radius_table_header(first: &str, summaries: &[RadiusSummary]) -> String {
    let mut header = format!("| {} |", first);
    let mut align = String::from("|:---|");
    for s in summaries {
        if s.estimated {
            header.push_str(&format!(" {} (est.) |", s.label));
        } else {
            header.push_str(&format!(" {} |", s.label));
        }
        align.push_str("---:|");
    }
    format!("{}\n{}\n", header, align)
}

fn radius_table_row<F>(label: &str, summaries: &[RadiusSummary], cell: F) -> String
where
    F: Fn(&RadiusSummary) -> String,
{
    let mut row = format!("| {} |", label);
    for s in summaries {
        row.push_str(&format!(" {} |", cell(s)));
    }
    row.push('\n');
    row
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Center:** {}\n", metadata.center));
    let radii: Vec<String> = metadata.radii.iter().map(|r| format!("{}", r)).collect();
    section.push_str(&format!("- **Radii (miles):** {}\n", radii.join(", ")));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Area Units Indexed:** {}\n",
        metadata.units_in_index
    ));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_geography_section(geography: &Geography) -> String {
    let mut section = String::new();

    section.push_str("## Location\n\n");
    section.push_str(&format!(
        "- **County:** {}, {}\n",
        geography.county_name, geography.state_name
    ));
    section.push_str(&format!(
        "- **FIPS:** {}{}\n",
        geography.state_code, geography.county_code
    ));
    if geography.area_median_income > 0.0 {
        section.push_str(&format!(
            "- **Area Median Household Income:** {}\n",
            format_currency(geography.area_median_income)
        ));
    }
    section.push('\n');

    section
}

fn generate_population_section(summaries: &[RadiusSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Population & Households\n\n");
    section.push_str(&radius_table_header("Metric", summaries));
    section.push_str(&radius_table_row("Area Units", summaries, |s| {
        format!("{}/{}", s.matched_count, s.member_count)
    }));
    section.push_str(&radius_table_row("Population", summaries, |s| {
        format_count(s.population)
    }));
    section.push_str(&radius_table_row("Households", summaries, |s| {
        format_count(s.households)
    }));
    section.push_str(&radius_table_row("Families", summaries, |s| {
        format_count(s.families)
    }));
    section.push_str(&radius_table_row("Avg. Household Size", summaries, |s| {
        format!("{:.2}", s.average_household_size)
    }));
    section.push_str(&radius_table_row("Median Household Income", summaries, |s| {
        format_currency(s.median_income)
    }));
    section.push_str(&radius_table_row("Per Capita Income", summaries, |s| {
        format_currency(s.per_capita_income)
    }));
    section.push('\n');

    section
}

fn generate_age_section(summaries: &[RadiusSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Age Distribution\n\n");
    section.push_str(&radius_table_header("Age", summaries));
    for cohort in AgeCohort::ALL {
        section.push_str(&radius_table_row(&cohort.to_string(), summaries, |s| {
            format!(
                "{} ({:.1}%)",
                format_count(s.age.get(cohort)),
                s.age_share.get(cohort)
            )
        }));
    }
    section.push('\n');

    section
}

fn generate_income_section(summaries: &[RadiusSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Household Income\n\n");
    section.push_str(&radius_table_header("Bracket", summaries));
    for bracket in IncomeBracket::ALL {
        section.push_str(&radius_table_row(&bracket.to_string(), summaries, |s| {
            format!(
                "{} ({:.1}%)",
                format_count(s.income.get(bracket)),
                s.income_share.get(bracket)
            )
        }));
    }
    section.push('\n');

    section
}

fn generate_housing_section(summaries: &[RadiusSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Housing\n\n");
    section.push_str(&radius_table_header("Metric", summaries));
    section.push_str(&radius_table_row("Housing Units", summaries, |s| {
        format_count(s.housing.total_units)
    }));
    section.push_str(&radius_table_row("Median Home Value", summaries, |s| {
        format_currency(s.housing.median_value)
    }));
    section.push_str(&radius_table_row("Median Gross Rent", summaries, |s| {
        format_currency(s.housing.median_rent)
    }));
    section.push('\n');

    section
}

fn generate_employment_section(summaries: &[RadiusSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Employment & Education\n\n");
    section.push_str(&radius_table_header("Rate", summaries));
    for metric in RateMetric::ALL {
        section.push_str(&radius_table_row(&metric.to_string(), summaries, |s| {
            match s.employment.get(metric) {
                Some(m) => format!("{:.1}% (US {:.1}%)", m.local, m.national),
                None => "-".to_string(),
            }
        }));
    }
    section.push('\n');

    section
}

fn generate_projection_section(summaries: &[RadiusSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Growth Projections\n\n");
    section.push_str(&radius_table_header("Series", summaries));
    for series in Series::ALL {
        section.push_str(&radius_table_row(&series.to_string(), summaries, |s| {
            let Some(p) = s.projection(series) else {
                return "-".to_string();
            };
            let value = if series.is_intensive() {
                format_currency(p.projected)
            } else {
                format_count(p.projected)
            };
            if p.projected > 0.0 {
                format!("{} ({})", value, format_signed_percent(p.percent_change))
            } else {
                "n/a".to_string()
            }
        }));
    }
    section.push('\n');

    section
}

fn generate_age_shift_section(shift: &AgeShiftProjection) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Age Shift ({}-Year Projection)\n\n",
        shift.horizon_years
    ));
    section.push_str("| Age | Current | Projected | CAGR | Share Now | Share Projected | Shift |\n");
    section.push_str("|:---|---:|---:|---:|---:|---:|:---:|\n");
    for c in &shift.cohorts {
        let arrow = match c.trend {
            Trend::Positive => "▲",
            Trend::Negative => "▼",
            Trend::Neutral => "–",
        };
        section.push_str(&format!(
            "| {} | {} | {} | {:.2}% | {:.1}% | {:.1}% | {} {:+.1} pts |\n",
            c.cohort,
            format_count(c.current),
            format_count(c.projected),
            c.cagr * 100.0,
            c.share_current,
            c.share_projected,
            arrow,
            c.delta_points
        ));
    }
    section.push('\n');

    section
}

fn generate_diagnostics_section(diagnostics: &Diagnostics) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Data Notes\n\n");
    section.push_str("| Note | Count |\n");
    section.push_str("|:---|:---:|\n");
    for (kind, count) in diagnostics.counts() {
        section.push_str(&format!("| {} | {} |\n", kind, count));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Radii marked (est.) had no usable data and were estimated.*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write the report to a file in the given format.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{estimate_for_radius, project_age_shift};
    use crate::diagnostics::DiagnosticKind;
    use crate::models::{Center, MultiRadiusReport};
    use chrono::Utc;

    fn create_test_report() -> Report {
        let mut summaries = vec![estimate_for_radius(1.0), estimate_for_radius(3.0)];
        let largest = &mut summaries[1];
        largest.age_shift = Some(project_age_shift(&largest.age, &largest.age_prior, 5.0, 5));

        let mut diagnostics = Diagnostics::new();
        diagnostics.record(DiagnosticKind::EstimatedRadius, None, "1mile");
        diagnostics.record(DiagnosticKind::EstimatedRadius, None, "3mile");

        Report {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                center: Center::new(32.7767, -96.797),
                radii: vec![1.0, 3.0],
                units_in_index: 0,
                duration_seconds: 0.5,
            },
            analysis: MultiRadiusReport {
                center: Center::new(32.7767, -96.797),
                radii: vec![1.0, 3.0],
                summaries,
                union_count: 0,
                geography: None,
                diagnostics,
            },
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(-4500.0), "-4,500");
        assert_eq!(format_currency(65000.0), "$65,000");
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Radius Demographics Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| Metric | 1mile (est.) | 3mile (est.) |"));
        assert!(markdown.contains("| Population | 15,000 | 45,000 |"));
        assert!(markdown.contains("## Age Shift (5-Year Projection)"));
        assert!(markdown.contains("| estimated radius | 2 |"));
        assert!(!markdown.contains("## Location"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"summaries\""));
        assert!(json.contains("\"3mile\""));
        assert!(json.contains("\"estimated\": true"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_report("# test\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# test\n");
    }
}
