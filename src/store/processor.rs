//! Record processor: typed demographic rows → canonical records.

use std::collections::HashMap;
use tracing::info;

use super::tables::{DemographicRow, DemographicTable, GrowthColumns};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::models::{
    AgeCohorts, CanonicalRecord, HousingStats, IncomeBrackets, IncomeBracket, SeriesGrowth,
};

/// Canonical records for one call, keyed by identifier.
pub type RecordMap = HashMap<String, CanonicalRecord>;

fn value(v: Option<f64>) -> f64 {
    v.unwrap_or(0.0)
}

fn cohorts(values: &[Option<f64>; 5]) -> AgeCohorts {
    AgeCohorts((*values).map(value))
}

fn growth(columns: &GrowthColumns) -> SeriesGrowth {
    SeriesGrowth {
        change: value(columns.change),
        cagr: value(columns.cagr),
        projected: value(columns.projected),
    }
}

/// Convert one typed row into a canonical record. Absent values become zero.
pub fn process_row(row: &DemographicRow) -> CanonicalRecord {
    let mut income = IncomeBrackets::default();
    for bracket in IncomeBracket::ALL {
        income.0[bracket.index()] = bracket
            .source_columns()
            .map(|column| value(row.income_count(column)))
            .sum();
    }

    CanonicalRecord {
        population: value(row.population),
        households: value(row.households),
        families: value(row.families),
        median_income: value(row.median_income),
        per_capita_income: value(row.per_capita_income),
        age_current: cohorts(&row.age_current),
        age_prior: cohorts(&row.age_prior),
        income,
        housing: HousingStats {
            total_units: value(row.housing_units),
            median_value: value(row.median_home_value),
            median_rent: value(row.median_rent),
        },
        growth: row.growth.map(|g| growth(&g)),
    }
}

/// Build canonical records for every identifier found in `table`.
///
/// Identifiers without a row are left out of the map and recorded as
/// [`DiagnosticKind::DemographicMiss`]; they take no part in aggregation.
pub fn build_records(
    identifiers: &[String],
    table: &DemographicTable,
    diagnostics: &mut Diagnostics,
) -> RecordMap {
    let mut records = RecordMap::with_capacity(identifiers.len());

    for id in identifiers {
        if records.contains_key(id) {
            continue;
        }
        match table.get(id) {
            Some(row) => {
                records.insert(id.clone(), process_row(row));
            }
            None => diagnostics.record(
                DiagnosticKind::DemographicMiss,
                Some(id),
                "identifier not found in demographic table",
            ),
        }
    }

    info!(
        "Demographic records built: {}/{} units found",
        records.len(),
        identifiers.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeCohort, Series};
    use crate::store::tables::RawRow;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_income_buckets_sum_disjoint_columns() {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for column in 2..=17 {
            pairs.push((format!("B19001_{:03}E_curr", column), column.to_string()));
        }
        let row: RawRow = pairs.into_iter().collect();
        let record = process_row(&DemographicRow::from_raw(&row));

        assert_eq!(record.income.get(IncomeBracket::Under25k), 2.0 + 3.0 + 4.0 + 5.0);
        assert_eq!(record.income.get(IncomeBracket::From25kTo50k), 6.0 + 7.0 + 8.0 + 9.0);
        assert_eq!(record.income.get(IncomeBracket::From50kTo75k), 10.0 + 11.0 + 12.0);
        assert_eq!(record.income.get(IncomeBracket::From75kTo100k), 13.0);
        assert_eq!(record.income.get(IncomeBracket::From100kTo150k), 14.0 + 15.0);
        assert_eq!(record.income.get(IncomeBracket::Over150k), 16.0 + 17.0);
        assert_eq!(record.income.total(), (2..=17).sum::<i32>() as f64);
    }

    #[test]
    fn test_missing_and_sentinel_values_are_zero() {
        let row = raw(&[
            ("B01003_001E_curr", "-666666666"),
            ("B11001_001E_curr", ""),
            ("age_18_34_curr", "300"),
            ("change_hh", "12"),
        ]);
        let record = process_row(&DemographicRow::from_raw(&row));

        assert_eq!(record.population, 0.0);
        assert_eq!(record.households, 0.0);
        assert_eq!(record.median_income, 0.0);
        assert_eq!(record.age_current.get(AgeCohort::Age18To34), 300.0);
        assert_eq!(record.growth(Series::Households).change, 12.0);
        assert!(record.growth.iter().all(|g| g.cagr.is_finite()));
    }

    #[test]
    fn test_build_records_excludes_misses() {
        let table = DemographicTable::from_keyed_rows(vec![
            ("481130001001", raw(&[("B01003_001E_curr", "100")])),
            ("481130001002", raw(&[("B01003_001E_curr", "200")])),
        ]);
        let ids = vec![
            "481130001001".to_string(),
            "481130009999".to_string(),
            "481130001002".to_string(),
        ];
        let mut diag = Diagnostics::new();
        let records = build_records(&ids, &table, &mut diag);

        assert_eq!(records.len(), 2);
        assert_eq!(records["481130001002"].population, 200.0);
        assert_eq!(diag.identifiers(DiagnosticKind::DemographicMiss), vec!["481130009999"]);
    }
}
