//! Typed demographic and rate tables.
//!
//! Raw rows arrive as `column name → text` mappings. Each row is decoded
//! once, at load time, into a fixed struct whose absent or sentinel columns
//! are `None`. Nothing downstream looks columns up by header text.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{AgeCohort, RateMetric, Series};

/// One parsed row of delimited text: column name → raw value.
pub type RawRow = HashMap<String, String>;

/// Census "not available" marker.
pub const SENTINEL: f64 = -666_666_666.0;

/// Minimum digits in a block-group identifier (2+3+6 before the group digit).
pub const MIN_IDENTIFIER_LEN: usize = 11;

/// Number of `B19001_0NNE` household income sub-columns (002 through 017).
pub const INCOME_SUBCOLUMNS: usize = 16;

/// Parse a raw cell as a number.
///
/// Empty cells, `null`, `N/A`, the census sentinel, unparsable text and
/// non-finite values all yield `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let s = raw.trim().trim_matches('"').trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("n/a") {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() || value == SENTINEL {
        return None;
    }
    Some(value)
}

/// Case-insensitive view over a raw row.
struct Columns<'a> {
    by_name: HashMap<String, &'a str>,
}

impl<'a> Columns<'a> {
    fn new(row: &'a RawRow) -> Self {
        let by_name = row
            .iter()
            .map(|(k, v)| (k.trim().trim_matches('"').to_ascii_lowercase(), v.as_str()))
            .collect();
        Self { by_name }
    }

    fn text(&self, name: &str) -> Option<&'a str> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(|v| v.trim().trim_matches('"').trim())
            .filter(|v| !v.is_empty())
    }

    fn num(&self, name: &str) -> Option<f64> {
        self.text(name).and_then(parse_numeric)
    }
}

/// Columns an identifier can be derived from; a table needs at least one.
pub const IDENTIFIER_COLUMNS: [&str; 2] = ["GEOID", "state"];

/// Whether `row` carries any column an identifier can be derived from.
pub fn has_identifier_column(row: &RawRow) -> bool {
    row.keys().any(|k| {
        let name = k.trim().trim_matches('"');
        IDENTIFIER_COLUMNS
            .iter()
            .any(|c| name.eq_ignore_ascii_case(c))
    })
}

/// Derive the unit identifier from a raw row.
///
/// A `GEOID` column wins (non-digits stripped). Otherwise the identifier is
/// assembled from `state`, `county`, `tract` and `block group`, zero-padded
/// to 2, 3 and 6 digits. Returns `None` when fewer than 11 digits result.
pub fn derive_identifier(row: &RawRow) -> Option<String> {
    identifier_from(&Columns::new(row))
}

fn identifier_from(cols: &Columns<'_>) -> Option<String> {
    if let Some(raw) = cols.text("GEOID") {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            return valid_identifier(digits);
        }
    }

    let state = cols.text("state")?;
    let county = cols.text("county").unwrap_or("");
    let tract = cols.text("tract").unwrap_or("").replace('.', "");
    let group = cols.text("block group").unwrap_or("");
    valid_identifier(format!("{:0>2}{:0>3}{:0>6}{}", state, county, tract, group))
}

fn valid_identifier(id: String) -> Option<String> {
    if id.len() >= MIN_IDENTIFIER_LEN && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}

/// Growth columns for one series, as read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrowthColumns {
    pub change: Option<f64>,
    pub cagr: Option<f64>,
    pub projected: Option<f64>,
}

/// Typed row of the primary (wide) demographic table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemographicRow {
    pub population: Option<f64>,
    pub households: Option<f64>,
    pub families: Option<f64>,
    pub median_income: Option<f64>,
    pub per_capita_income: Option<f64>,
    /// Indexed by [`AgeCohort::index`].
    pub age_current: [Option<f64>; 5],
    pub age_prior: [Option<f64>; 5],
    /// `B19001_002E_curr` through `B19001_017E_curr`.
    pub income_counts: [Option<f64>; INCOME_SUBCOLUMNS],
    pub housing_units: Option<f64>,
    pub median_home_value: Option<f64>,
    pub median_rent: Option<f64>,
    /// Indexed by [`Series::index`].
    pub growth: [GrowthColumns; 5],
}

impl DemographicRow {
    /// Decode the known columns of a raw row.
    pub fn from_raw(row: &RawRow) -> Self {
        Self::from_columns(&Columns::new(row))
    }

    fn from_columns(cols: &Columns<'_>) -> Self {
        let mut decoded = Self {
            population: cols.num("B01003_001E_curr"),
            households: cols.num("B11001_001E_curr"),
            families: cols.num("B11001_002E_curr"),
            median_income: cols.num("B19013_001E_curr"),
            per_capita_income: cols.num("B19301_001E_curr"),
            housing_units: cols.num("B25001_001E_curr"),
            median_home_value: cols.num("B25077_001E_curr"),
            median_rent: cols.num("B25064_001E_curr"),
            ..Self::default()
        };

        for cohort in AgeCohort::ALL {
            let stem = cohort.column_stem();
            decoded.age_current[cohort.index()] = cols.num(&format!("{}_curr", stem));
            decoded.age_prior[cohort.index()] = cols.num(&format!("{}_prior", stem));
        }

        for (slot, value) in decoded.income_counts.iter_mut().enumerate() {
            *value = cols.num(&format!("B19001_{:03}E_curr", slot + 2));
        }

        for series in Series::ALL {
            let suffix = series.column_suffix();
            decoded.growth[series.index()] = GrowthColumns {
                change: cols.num(&format!("change_{}", suffix)),
                cagr: cols.num(&format!("CAGR_{}", suffix)),
                projected: cols.num(&format!("{}_proj", suffix)),
            };
        }

        decoded
    }

    /// Household count for one `B19001_0NNE` sub-column (2..=17).
    pub fn income_count(&self, column: usize) -> Option<f64> {
        column
            .checked_sub(2)
            .and_then(|slot| self.income_counts.get(slot))
            .copied()
            .flatten()
    }
}

/// Typed row of the secondary rate table. Rates are percentages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateRow {
    /// Indexed by [`RateMetric::index`].
    pub local: [Option<f64>; 5],
    /// National benchmarks, identical on every row of a well-formed table.
    pub national: [Option<f64>; 5],
}

impl RateRow {
    pub fn from_raw(row: &RawRow) -> Self {
        Self::from_columns(&Columns::new(row))
    }

    fn from_columns(cols: &Columns<'_>) -> Self {
        let mut decoded = Self::default();
        for metric in RateMetric::ALL {
            decoded.local[metric.index()] = cols.num(metric.column());
            decoded.national[metric.index()] = cols.num(metric.national_column());
        }
        decoded
    }

    /// Local rate, zero when absent.
    pub fn local(&self, metric: RateMetric) -> f64 {
        self.local[metric.index()].unwrap_or(0.0)
    }

    /// National benchmark, zero when absent.
    pub fn national(&self, metric: RateMetric) -> f64 {
        self.national[metric.index()].unwrap_or(0.0)
    }
}

/// Keyed table of typed rows.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: HashMap<String, R>,
    rejected: usize,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            rejected: 0,
        }
    }
}

impl<R> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, row: R) {
        let identifier = identifier.into();
        if self.rows.insert(identifier.clone(), row).is_some() {
            debug!("Duplicate row for {}; keeping the later one", identifier);
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&R> {
        self.rows.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.rows.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows dropped at load because no identifier could be derived.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

/// Decoding of one raw row into a typed row.
pub trait DecodeRow: Sized {
    fn decode(row: &RawRow) -> Self;
}

impl DecodeRow for DemographicRow {
    fn decode(row: &RawRow) -> Self {
        Self::from_raw(row)
    }
}

impl DecodeRow for RateRow {
    fn decode(row: &RawRow) -> Self {
        Self::from_raw(row)
    }
}

impl<R: DecodeRow> Table<R> {
    /// Decode rows whose identifier is carried in their own columns.
    ///
    /// Rows without a derivable identifier are counted in [`Table::rejected`].
    pub fn from_raw_rows<I: IntoIterator<Item = RawRow>>(rows: I) -> Self {
        let mut table = Self::new();
        for (line, row) in rows.into_iter().enumerate() {
            match derive_identifier(&row) {
                Some(id) => table.insert(id, R::decode(&row)),
                None => {
                    debug!("Row {}: could not build a valid identifier", line + 1);
                    table.rejected += 1;
                }
            }
        }
        if table.rejected > 0 {
            warn!(
                "{} rows rejected without a valid identifier ({} kept)",
                table.rejected,
                table.len()
            );
        }
        table
    }

    /// Decode rows already keyed by identifier.
    pub fn from_keyed_rows<I, K>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, RawRow)>,
        K: Into<String>,
    {
        let mut table = Self::new();
        for (id, row) in rows {
            table.insert(id, R::decode(&row));
        }
        table
    }
}

impl<R, K: Into<String>> FromIterator<(K, R)> for Table<R> {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (id, row) in iter {
            table.insert(id, row);
        }
        table
    }
}

/// Primary wide table: identifier → demographic row.
pub type DemographicTable = Table<DemographicRow>;

/// Secondary table: identifier → rate row.
pub type RateTable = Table<RateRow>;
