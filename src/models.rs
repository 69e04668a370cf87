//! Data models for the radius demographics engine.
//!
//! This module contains the canonical per-unit record, the aggregated
//! per-radius summary, and the small enums that name age cohorts, income
//! brackets and rate metrics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diagnostics::Diagnostics;

/// Five-band age cohort used by the primary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCohort {
    Under18,
    Age18To34,
    Age35To54,
    Age55To64,
    Age65Plus,
}

impl AgeCohort {
    /// All cohorts, youngest first.
    pub const ALL: [AgeCohort; 5] = [
        AgeCohort::Under18,
        AgeCohort::Age18To34,
        AgeCohort::Age35To54,
        AgeCohort::Age55To64,
        AgeCohort::Age65Plus,
    ];

    /// Position of this cohort in [`AgeCohort::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column stem in the primary table (`age_0_17` → `age_0_17_curr`).
    pub fn column_stem(self) -> &'static str {
        match self {
            AgeCohort::Under18 => "age_0_17",
            AgeCohort::Age18To34 => "age_18_34",
            AgeCohort::Age35To54 => "age_35_54",
            AgeCohort::Age55To64 => "age_55_64",
            AgeCohort::Age65Plus => "age_65plus",
        }
    }
}

impl fmt::Display for AgeCohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeCohort::Under18 => write!(f, "0-17"),
            AgeCohort::Age18To34 => write!(f, "18-34"),
            AgeCohort::Age35To54 => write!(f, "35-54"),
            AgeCohort::Age55To64 => write!(f, "55-64"),
            AgeCohort::Age65Plus => write!(f, "65+"),
        }
    }
}

/// Household income bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    Under25k,
    From25kTo50k,
    From50kTo75k,
    From75kTo100k,
    From100kTo150k,
    Over150k,
}

impl IncomeBracket {
    /// All brackets, lowest first.
    pub const ALL: [IncomeBracket; 6] = [
        IncomeBracket::Under25k,
        IncomeBracket::From25kTo50k,
        IncomeBracket::From50kTo75k,
        IncomeBracket::From75kTo100k,
        IncomeBracket::From100kTo150k,
        IncomeBracket::Over150k,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Inclusive range of `B19001_0NNE` sub-columns summed into this bracket.
    ///
    /// The sub-columns partition household income; 002 is "less than
    /// $10,000" and 017 is "$200,000 or more".
    pub fn source_columns(self) -> std::ops::RangeInclusive<usize> {
        match self {
            IncomeBracket::Under25k => 2..=5,
            IncomeBracket::From25kTo50k => 6..=9,
            IncomeBracket::From50kTo75k => 10..=12,
            IncomeBracket::From75kTo100k => 13..=13,
            IncomeBracket::From100kTo150k => 14..=15,
            IncomeBracket::Over150k => 16..=17,
        }
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncomeBracket::Under25k => write!(f, "Under $25,000"),
            IncomeBracket::From25kTo50k => write!(f, "$25,000 - $49,999"),
            IncomeBracket::From50kTo75k => write!(f, "$50,000 - $74,999"),
            IncomeBracket::From75kTo100k => write!(f, "$75,000 - $99,999"),
            IncomeBracket::From100kTo150k => write!(f, "$100,000 - $149,999"),
            IncomeBracket::Over150k => write!(f, "$150,000+"),
        }
    }
}

/// Percentage rate carried by the secondary (rate) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMetric {
    LaborForceParticipation,
    Unemployment,
    BachelorsOrHigher,
    HighSchoolOrHigher,
    ManagementOccupations,
}

impl RateMetric {
    pub const ALL: [RateMetric; 5] = [
        RateMetric::LaborForceParticipation,
        RateMetric::Unemployment,
        RateMetric::BachelorsOrHigher,
        RateMetric::HighSchoolOrHigher,
        RateMetric::ManagementOccupations,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Local rate column in the rate table.
    pub fn column(self) -> &'static str {
        match self {
            RateMetric::LaborForceParticipation => "labor_force_participation_rate",
            RateMetric::Unemployment => "unemployment_rate",
            RateMetric::BachelorsOrHigher => "bachelors_or_higher_rate",
            RateMetric::HighSchoolOrHigher => "high_school_or_higher_rate",
            RateMetric::ManagementOccupations => "professional_mgmt_occ_rate",
        }
    }

    /// National benchmark column, replicated on every row.
    pub fn national_column(self) -> &'static str {
        match self {
            RateMetric::LaborForceParticipation => "natl_labor_force_participation_rate",
            RateMetric::Unemployment => "natl_unemployment_rate",
            RateMetric::BachelorsOrHigher => "natl_bachelors_or_higher_rate",
            RateMetric::HighSchoolOrHigher => "natl_high_school_or_higher_rate",
            RateMetric::ManagementOccupations => "natl_professional_mgmt_occ_rate",
        }
    }
}

impl fmt::Display for RateMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateMetric::LaborForceParticipation => write!(f, "Labor Force Participation Rate"),
            RateMetric::Unemployment => write!(f, "Unemployment Rate"),
            RateMetric::BachelorsOrHigher => write!(f, "Bachelor's Degree or Higher"),
            RateMetric::HighSchoolOrHigher => write!(f, "High School Graduate or Higher"),
            RateMetric::ManagementOccupations => write!(f, "Professional/Management Occupations"),
        }
    }
}

/// Series that carry pre-computed change/CAGR/projection columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    Population,
    Households,
    Families,
    MedianIncome,
    PerCapitaIncome,
}

impl Series {
    pub const ALL: [Series; 5] = [
        Series::Population,
        Series::Households,
        Series::Families,
        Series::MedianIncome,
        Series::PerCapitaIncome,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Suffix used by `change_*`, `CAGR_*` and `*_proj` columns.
    pub fn column_suffix(self) -> &'static str {
        match self {
            Series::Population => "pop",
            Series::Households => "hh",
            Series::Families => "fam",
            Series::MedianIncome => "med_inc",
            Series::PerCapitaIncome => "per_capita",
        }
    }

    /// Intensive series project by averaging unit projections; extensive
    /// series project by adding the summed change to the current total.
    pub fn is_intensive(self) -> bool {
        matches!(self, Series::MedianIncome | Series::PerCapitaIncome)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Population => write!(f, "Population"),
            Series::Households => write!(f, "Households"),
            Series::Families => write!(f, "Families"),
            Series::MedianIncome => write!(f, "Median Household Income"),
            Series::PerCapitaIncome => write!(f, "Per Capita Income"),
        }
    }
}

/// Counts per age cohort, indexed by [`AgeCohort::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeCohorts(pub [f64; 5]);

impl AgeCohorts {
    pub fn get(&self, cohort: AgeCohort) -> f64 {
        self.0[cohort.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Household counts per income bracket, indexed by [`IncomeBracket::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeBrackets(pub [f64; 6]);

impl IncomeBrackets {
    pub fn get(&self, bracket: IncomeBracket) -> f64 {
        self.0[bracket.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Housing statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HousingStats {
    /// Total housing units (extensive).
    pub total_units: f64,
    /// Median home value in dollars (intensive).
    pub median_value: f64,
    /// Median gross rent in dollars (intensive).
    pub median_rent: f64,
}

/// Pre-computed growth columns for one series of one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesGrowth {
    /// Absolute change from the prior snapshot to the projection horizon.
    pub change: f64,
    /// Compound annual growth rate as a fraction (0.02 = 2%).
    pub cagr: f64,
    /// Projected value at the horizon.
    pub projected: f64,
}

/// Normalized, typed per-unit record. All fields are finite and missing
/// source values are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub population: f64,
    pub households: f64,
    pub families: f64,
    pub median_income: f64,
    pub per_capita_income: f64,
    pub age_current: AgeCohorts,
    pub age_prior: AgeCohorts,
    pub income: IncomeBrackets,
    pub housing: HousingStats,
    /// Growth columns indexed by [`Series::index`].
    pub growth: [SeriesGrowth; 5],
}

impl CanonicalRecord {
    pub fn growth(&self, series: Series) -> &SeriesGrowth {
        &self.growth[series.index()]
    }
}

/// A local rate paired with its national benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmploymentMetric {
    pub metric: RateMetric,
    /// Population-weighted local rate, in percent.
    pub local: f64,
    /// National benchmark, in percent.
    pub national: f64,
}

/// Employment and education rates for one radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentProfile {
    pub metrics: Vec<EmploymentMetric>,
}

impl EmploymentProfile {
    pub fn get(&self, metric: RateMetric) -> Option<&EmploymentMetric> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

/// Current value, growth and projection for one series over one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesProjection {
    pub series: Series,
    pub current: f64,
    /// Summed unit-level change.
    pub change: f64,
    /// Mean of non-zero unit CAGRs.
    pub cagr: f64,
    pub projected: f64,
    /// (projected - current) / current * 100; zero when either side is non-positive.
    pub percent_change: f64,
}

/// Direction of a cohort's share shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Positive => write!(f, "positive"),
            Trend::Negative => write!(f, "negative"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// Projected share shift for one age cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortShift {
    pub cohort: AgeCohort,
    pub current: f64,
    pub prior: f64,
    pub cagr: f64,
    pub projected: f64,
    /// Share of total cohort population now, in percent.
    pub share_current: f64,
    /// Share of total cohort population at the horizon, in percent.
    pub share_projected: f64,
    /// share_projected - share_current, in percentage points.
    pub delta_points: f64,
    pub trend: Trend,
}

/// Cohort-level projection for the largest radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeShiftProjection {
    /// Years between the prior and current snapshots.
    pub span_years: f64,
    /// Years projected forward.
    pub horizon_years: u32,
    pub total_current: f64,
    pub total_projected: f64,
    pub cohorts: Vec<CohortShift>,
}

/// Aggregated statistics for every area unit intersecting one radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusSummary {
    /// Radius in miles.
    pub radius: f64,
    /// Stable label such as `3mile`.
    pub label: String,
    /// True when produced by the estimation fallback.
    pub estimated: bool,
    /// Units classified into this radius.
    pub member_count: usize,
    /// Members with a demographic record.
    pub matched_count: usize,

    pub population: f64,
    pub households: f64,
    pub families: f64,
    pub average_household_size: f64,
    pub median_income: f64,
    pub per_capita_income: f64,

    pub age: AgeCohorts,
    pub age_prior: AgeCohorts,
    /// Cohort counts as percent of population.
    pub age_share: AgeCohorts,

    pub income: IncomeBrackets,
    /// Bracket counts as percent of households.
    pub income_share: IncomeBrackets,

    pub housing: HousingStats,
    pub employment: EmploymentProfile,
    pub projections: Vec<SeriesProjection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_shift: Option<AgeShiftProjection>,
}

impl RadiusSummary {
    pub fn projection(&self, series: Series) -> Option<&SeriesProjection> {
        self.projections.iter().find(|p| p.series == series)
    }
}

/// County/state context resolved from the identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    pub state_code: String,
    pub county_code: String,
    pub state_name: String,
    pub county_name: String,
    /// Mean of positive unit median incomes across the whole union.
    pub area_median_income: f64,
}

/// The center of a radius query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lng: f64,
}

impl Center {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// One summary per radius plus shared context and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRadiusReport {
    pub center: Center,
    /// Normalized radii, ascending.
    pub radii: Vec<f64>,
    /// Summaries in the same order as `radii`.
    pub summaries: Vec<RadiusSummary>,
    /// Unique units within the largest radius.
    pub union_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geography: Option<Geography>,
    pub diagnostics: Diagnostics,
}

impl MultiRadiusReport {
    /// Look up a summary by its label (e.g. `5mile`).
    pub fn get(&self, label: &str) -> Option<&RadiusSummary> {
        self.summaries.iter().find(|s| s.label == label)
    }

    pub fn largest(&self) -> Option<&RadiusSummary> {
        self.summaries.last()
    }
}

/// Label used to key a radius in reports (`1mile`, `2.5mile`).
pub fn radius_label(radius: f64) -> String {
    if radius.fract() == 0.0 {
        format!("{}mile", radius as i64)
    } else {
        format!("{}mile", radius)
    }
}
