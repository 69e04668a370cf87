//! Per-radius aggregation.
//!
//! Members are folded into a [`RadiusAccumulator`] one at a time and the
//! accumulator is finished into a [`RadiusSummary`]. Each field follows one
//! of four policies:
//!
//! - extensive counts are summed
//! - intensive medians are the mean of positive unit values, with a fallback
//! - rates are population-weighted, with the national benchmark as fallback
//! - growth CAGRs are the mean of non-zero unit values

use super::benchmark::NationalBenchmarks;
use super::stats::{percent_change, ratio, round_to, share_percent, MeanAccumulator, WeightedMean};
use crate::models::{
    radius_label, AgeCohorts, CanonicalRecord, EmploymentMetric, EmploymentProfile, HousingStats,
    IncomeBrackets, RadiusSummary, RateMetric, Series, SeriesProjection,
};
use crate::store::{RateRow, RateTable, RecordMap};

/// Median household income used when no member reports one.
pub const FALLBACK_MEDIAN_INCOME: f64 = 65_000.0;
/// Per-capita income used when no member reports one.
pub const FALLBACK_PER_CAPITA_INCOME: f64 = 38_000.0;
/// Median home value used when no member reports one.
pub const FALLBACK_HOME_VALUE: f64 = 285_000.0;
/// Median gross rent used when no member reports one.
pub const FALLBACK_RENT: f64 = 1_450.0;

/// Running totals for one radius.
#[derive(Debug, Clone, Default)]
pub struct RadiusAccumulator {
    member_count: usize,
    matched_count: usize,

    population: f64,
    households: f64,
    families: f64,
    age: [f64; 5],
    age_prior: [f64; 5],
    income: [f64; 6],
    housing_units: f64,

    median_income: MeanAccumulator,
    per_capita_income: MeanAccumulator,
    home_value: MeanAccumulator,
    rent: MeanAccumulator,

    change: [f64; 5],
    cagr: [MeanAccumulator; 5],
    projected: [MeanAccumulator; 5],

    rates: [WeightedMean; 5],
}

impl RadiusAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one member into the totals.
    ///
    /// A member without a demographic record counts toward `member_count`
    /// only; its rate row is ignored as well.
    pub fn add(mut self, record: Option<&CanonicalRecord>, rate: Option<&RateRow>) -> Self {
        self.member_count += 1;
        let Some(record) = record else {
            return self;
        };
        self.matched_count += 1;

        self.population += record.population;
        self.households += record.households;
        self.families += record.families;
        for (slot, value) in self.age.iter_mut().zip(record.age_current.0) {
            *slot += value;
        }
        for (slot, value) in self.age_prior.iter_mut().zip(record.age_prior.0) {
            *slot += value;
        }
        for (slot, value) in self.income.iter_mut().zip(record.income.0) {
            *slot += value;
        }
        self.housing_units += record.housing.total_units;

        self.median_income.add_positive(record.median_income);
        self.per_capita_income.add_positive(record.per_capita_income);
        self.home_value.add_positive(record.housing.median_value);
        self.rent.add_positive(record.housing.median_rent);

        for series in Series::ALL {
            let growth = record.growth(series);
            let i = series.index();
            self.change[i] += growth.change;
            self.cagr[i].add_nonzero(growth.cagr);
            self.projected[i].add_positive(growth.projected);
        }

        if let Some(rate) = rate {
            let weight = if record.population > 0.0 {
                record.population
            } else {
                1.0
            };
            for metric in RateMetric::ALL {
                let value = rate.local(metric);
                if value > 0.0 {
                    self.rates[metric.index()].add(value, weight);
                }
            }
        }

        self
    }

    fn current(&self, series: Series, median_income: f64, per_capita_income: f64) -> f64 {
        match series {
            Series::Population => self.population,
            Series::Households => self.households,
            Series::Families => self.families,
            Series::MedianIncome => median_income,
            Series::PerCapitaIncome => per_capita_income,
        }
    }

    fn projection(&self, series: Series, current: f64) -> SeriesProjection {
        let i = series.index();
        let change = self.change[i];
        let projected = if series.is_intensive() {
            self.projected[i].mean().map(f64::round).unwrap_or(0.0)
        } else {
            (current + change).round()
        };
        SeriesProjection {
            series,
            current,
            change,
            cagr: self.cagr[i].mean().unwrap_or(0.0),
            projected,
            percent_change: percent_change(current, projected),
        }
    }

    /// Finish the totals into a summary for `radius`.
    pub fn finish(self, radius: f64, benchmarks: &NationalBenchmarks) -> RadiusSummary {
        let median_income = self
            .median_income
            .mean()
            .map(f64::round)
            .unwrap_or(FALLBACK_MEDIAN_INCOME);
        let per_capita_income = self
            .per_capita_income
            .mean()
            .map(f64::round)
            .unwrap_or(FALLBACK_PER_CAPITA_INCOME);

        let projections = Series::ALL
            .iter()
            .map(|s| self.projection(*s, self.current(*s, median_income, per_capita_income)))
            .collect();

        let employment = EmploymentProfile {
            metrics: RateMetric::ALL
                .iter()
                .map(|m| {
                    let national = benchmarks.get(*m);
                    EmploymentMetric {
                        metric: *m,
                        local: self.rates[m.index()]
                            .mean()
                            .map(|v| round_to(v, 1))
                            .unwrap_or(national),
                        national,
                    }
                })
                .collect(),
        };

        RadiusSummary {
            radius,
            label: radius_label(radius),
            estimated: false,
            member_count: self.member_count,
            matched_count: self.matched_count,
            population: self.population,
            households: self.households,
            families: self.families,
            average_household_size: ratio(self.population, self.households),
            median_income,
            per_capita_income,
            age: AgeCohorts(self.age),
            age_prior: AgeCohorts(self.age_prior),
            age_share: AgeCohorts(self.age.map(|c| share_percent(c, self.population))),
            income: IncomeBrackets(self.income),
            income_share: IncomeBrackets(self.income.map(|b| share_percent(b, self.households))),
            housing: HousingStats {
                total_units: self.housing_units,
                median_value: self
                    .home_value
                    .mean()
                    .map(f64::round)
                    .unwrap_or(FALLBACK_HOME_VALUE),
                median_rent: self.rent.mean().map(f64::round).unwrap_or(FALLBACK_RENT),
            },
            employment,
            projections,
            age_shift: None,
        }
    }
}

/// Aggregate the members of one radius.
///
/// Identifiers missing from `records` are excluded from every sum, mean and
/// weight; they still count toward the member total.
pub fn aggregate_radius(
    radius: f64,
    identifiers: &[String],
    records: &RecordMap,
    rates: Option<&RateTable>,
    benchmarks: &NationalBenchmarks,
) -> RadiusSummary {
    identifiers
        .iter()
        .fold(RadiusAccumulator::new(), |acc, id| {
            acc.add(records.get(id), rates.and_then(|table| table.get(id)))
        })
        .finish(radius, benchmarks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeCohort, IncomeBracket, SeriesGrowth};
    use approx::assert_relative_eq;

    fn record(population: f64, households: f64, median_income: f64) -> CanonicalRecord {
        CanonicalRecord {
            population,
            households,
            median_income,
            ..CanonicalRecord::default()
        }
    }

    fn rate(lfpr: f64, unemployment: f64) -> RateRow {
        let mut row = RateRow::default();
        row.local[RateMetric::LaborForceParticipation.index()] = Some(lfpr);
        row.local[RateMetric::Unemployment.index()] = Some(unemployment);
        row
    }

    fn records(entries: Vec<(&str, CanonicalRecord)>) -> RecordMap {
        entries
            .into_iter()
            .map(|(id, r)| (id.to_string(), r))
            .collect()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_radius_sums_and_means() {
        let recs = records(vec![
            ("A", record(1000.0, 400.0, 50000.0)),
            ("B", record(3500.0, 1200.0, 70000.0)),
        ]);
        let summary = aggregate_radius(
            1.0,
            &ids(&["A", "B"]),
            &recs,
            None,
            &NationalBenchmarks::fallback(),
        );

        assert_eq!(summary.label, "1mile");
        assert_eq!(summary.population, 4500.0);
        assert_eq!(summary.households, 1600.0);
        assert_eq!(summary.median_income, 60000.0);
        assert_eq!(summary.member_count, 2);
        assert_eq!(summary.matched_count, 2);
        assert!(!summary.estimated);
        assert_relative_eq!(summary.average_household_size, 4500.0 / 1600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_medians_do_not_drag_mean() {
        let recs = records(vec![
            ("A", record(10.0, 5.0, 0.0)),
            ("B", record(10.0, 5.0, 80000.0)),
        ]);
        let s = aggregate_radius(1.0, &ids(&["A", "B"]), &recs, None, &NationalBenchmarks::fallback());
        assert_eq!(s.median_income, 80000.0);
        assert_eq!(s.per_capita_income, FALLBACK_PER_CAPITA_INCOME);
        assert_eq!(s.housing.median_value, FALLBACK_HOME_VALUE);
        assert_eq!(s.housing.median_rent, FALLBACK_RENT);
    }

    #[test]
    fn test_unmatched_members_excluded() {
        let recs = records(vec![("A", record(500.0, 200.0, 40000.0))]);
        let s = aggregate_radius(3.0, &ids(&["A", "X"]), &recs, None, &NationalBenchmarks::fallback());
        assert_eq!(s.member_count, 2);
        assert_eq!(s.matched_count, 1);
        assert_eq!(s.population, 500.0);
        assert_eq!(s.median_income, 40000.0);
    }

    #[test]
    fn test_population_weighted_rates() {
        let recs = records(vec![
            ("A", record(1000.0, 1.0, 1.0)),
            ("B", record(3000.0, 1.0, 1.0)),
            ("C", record(0.0, 0.0, 0.0)),
        ]);
        let table = [
            ("A", rate(60.0, 2.0)),
            ("B", rate(70.0, 0.0)),
            ("C", rate(90.0, 10.0)),
        ]
        .into_iter()
        .collect::<RateTable>();
        let s = aggregate_radius(
            1.0,
            &ids(&["A", "B", "C"]),
            &recs,
            Some(&table),
            &NationalBenchmarks::fallback(),
        );

        let lfpr = s.employment.get(RateMetric::LaborForceParticipation).unwrap();
        // (60*1000 + 70*3000 + 90*1) / 4001
        assert_eq!(lfpr.local, 67.5);
        assert_eq!(lfpr.national, 63.4);

        // B's zero unemployment does not contribute
        let unemployment = s.employment.get(RateMetric::Unemployment).unwrap();
        assert_eq!(unemployment.local, 2.0);

        // no contributor at all: benchmark
        let bach = s.employment.get(RateMetric::BachelorsOrHigher).unwrap();
        assert_eq!(bach.local, 33.7);
    }

    #[test]
    fn test_weighted_rate_bounded_by_members() {
        let recs = records(vec![
            ("A", record(120.0, 1.0, 1.0)),
            ("B", record(880.0, 1.0, 1.0)),
        ]);
        let table: RateTable = [("A", rate(55.0, 3.0)), ("B", rate(71.0, 6.0))]
            .into_iter()
            .collect();
        let s = aggregate_radius(1.0, &ids(&["A", "B"]), &recs, Some(&table), &NationalBenchmarks::fallback());
        let unemployment = s.employment.get(RateMetric::Unemployment).unwrap();
        assert!(unemployment.local >= 3.0 && unemployment.local <= 6.0);
        let lfpr = s.employment.get(RateMetric::LaborForceParticipation).unwrap();
        assert!(lfpr.local >= 55.0 && lfpr.local <= 71.0);
    }

    #[test]
    fn test_shares_and_distributions() {
        let mut a = record(1000.0, 400.0, 50000.0);
        a.age_current = AgeCohorts([200.0, 250.0, 300.0, 150.0, 100.0]);
        a.income = IncomeBrackets([100.0, 100.0, 80.0, 60.0, 40.0, 20.0]);
        let recs = records(vec![("A", a)]);
        let s = aggregate_radius(1.0, &ids(&["A"]), &recs, None, &NationalBenchmarks::fallback());

        assert_relative_eq!(s.age_share.get(AgeCohort::Under18), 20.0, epsilon = 1e-9);
        assert_relative_eq!(s.age_share.get(AgeCohort::Age65Plus), 10.0, epsilon = 1e-9);
        assert_relative_eq!(s.income_share.get(IncomeBracket::Under25k), 25.0, epsilon = 1e-9);
        assert_relative_eq!(s.income_share.get(IncomeBracket::Over150k), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_denominators_are_zero() {
        let recs = records(vec![("A", record(0.0, 0.0, 0.0))]);
        let s = aggregate_radius(1.0, &ids(&["A"]), &recs, None, &NationalBenchmarks::fallback());
        assert_eq!(s.average_household_size, 0.0);
        assert!(s.age_share.0.iter().all(|v| *v == 0.0));
        assert!(s.income_share.0.iter().all(|v| *v == 0.0));
        assert!(s
            .projections
            .iter()
            .all(|p| p.percent_change.is_finite() && p.cagr.is_finite()));
    }

    #[test]
    fn test_growth_projections() {
        let mut a = record(1000.0, 400.0, 60000.0);
        a.growth[Series::Population.index()] = SeriesGrowth {
            change: 50.0,
            cagr: 0.01,
            projected: 1050.0,
        };
        a.growth[Series::MedianIncome.index()] = SeriesGrowth {
            change: 3000.0,
            cagr: 0.02,
            projected: 63000.0,
        };
        let mut b = record(2000.0, 800.0, 60000.0);
        b.growth[Series::Population.index()] = SeriesGrowth {
            change: -20.0,
            cagr: 0.0,
            projected: 1980.0,
        };
        b.growth[Series::MedianIncome.index()] = SeriesGrowth {
            change: 6000.0,
            cagr: 0.04,
            projected: 69000.0,
        };
        let recs = records(vec![("A", a), ("B", b)]);
        let s = aggregate_radius(5.0, &ids(&["A", "B"]), &recs, None, &NationalBenchmarks::fallback());

        let pop = s.projection(Series::Population).unwrap();
        assert_eq!(pop.current, 3000.0);
        assert_eq!(pop.change, 30.0);
        assert_eq!(pop.projected, 3030.0);
        // zero CAGR is excluded from the mean
        assert_relative_eq!(pop.cagr, 0.01);
        assert_relative_eq!(pop.percent_change, 1.0, epsilon = 1e-9);

        let income = s.projection(Series::MedianIncome).unwrap();
        assert_eq!(income.current, 60000.0);
        assert_eq!(income.projected, 66000.0);
        assert_relative_eq!(income.cagr, 0.03, epsilon = 1e-12);
        assert_relative_eq!(income.percent_change, 10.0, epsilon = 1e-9);

        // no unit projects per-capita income; current is the fallback
        let per_capita = s.projection(Series::PerCapitaIncome).unwrap();
        assert_eq!(per_capita.current, FALLBACK_PER_CAPITA_INCOME);
        assert_eq!(per_capita.projected, 0.0);
        assert_eq!(per_capita.percent_change, -100.0);
    }

    #[test]
    fn test_income_without_projection_reports_full_decline() {
        let recs = records(vec![("A", record(1200.0, 500.0, 60000.0))]);
        let s = aggregate_radius(1.0, &ids(&["A"]), &recs, None, &NationalBenchmarks::fallback());

        let income = s.projection(Series::MedianIncome).unwrap();
        assert_eq!(income.current, 60000.0);
        assert_eq!(income.projected, 0.0);
        assert_eq!(income.percent_change, -100.0);
    }
}
