//! Estimation fallback for radii without usable data.
//!
//! The estimate is a deterministic function of the radius alone, scaled
//! from a fixed population density.

use super::aggregator::{
    FALLBACK_HOME_VALUE, FALLBACK_MEDIAN_INCOME, FALLBACK_PER_CAPITA_INCOME, FALLBACK_RENT,
};
use super::benchmark::FALLBACK_BENCHMARKS;
use super::stats::{percent_change, ratio, share_percent};
use crate::models::{
    radius_label, AgeCohorts, EmploymentMetric, EmploymentProfile, HousingStats, IncomeBrackets,
    RadiusSummary, RateMetric, Series, SeriesProjection,
};

/// Residents per radius mile.
pub const POPULATION_PER_MILE: f64 = 15_000.0;
pub const HOUSEHOLDS_PER_RESIDENT: f64 = 0.35;
pub const FAMILIES_PER_RESIDENT: f64 = 0.23;
pub const HOUSING_UNITS_PER_RESIDENT: f64 = 0.38;
/// Population growth to the projection horizon.
pub const POPULATION_GROWTH: f64 = 1.08;

/// Age cohort shares of population, youngest first.
pub const AGE_SHARES: [f64; 5] = [0.157, 0.241, 0.272, 0.189, 0.143];
/// Income bracket shares of households, lowest first.
pub const INCOME_SHARES: [f64; 6] = [0.128, 0.207, 0.221, 0.171, 0.154, 0.118];
/// Local rates, indexed like [`RateMetric::ALL`].
pub const LOCAL_RATES: [f64; 5] = [63.5, 3.8, 32.1, 88.9, 38.2];

/// Synthesize a summary for `radius` from fixed densities and shares.
pub fn estimate_for_radius(radius: f64) -> RadiusSummary {
    let base = POPULATION_PER_MILE * radius;
    let population = base.round();
    let households = (base * HOUSEHOLDS_PER_RESIDENT).round();
    let families = (base * FAMILIES_PER_RESIDENT).round();
    let projected_population = (base * POPULATION_GROWTH).round();

    // brackets split the unrounded household count
    let age = AgeCohorts(AGE_SHARES.map(|share| (base * share).round()));
    let income = IncomeBrackets(
        INCOME_SHARES.map(|share| (base * HOUSEHOLDS_PER_RESIDENT * share).round()),
    );

    let projections = Series::ALL
        .iter()
        .map(|series| {
            let current = match series {
                Series::Population => population,
                Series::Households => households,
                Series::Families => families,
                Series::MedianIncome => FALLBACK_MEDIAN_INCOME,
                Series::PerCapitaIncome => FALLBACK_PER_CAPITA_INCOME,
            };
            let projected = match series {
                Series::Population => projected_population,
                _ => current,
            };
            SeriesProjection {
                series: *series,
                current,
                change: projected - current,
                cagr: 0.0,
                projected,
                percent_change: percent_change(current, projected),
            }
        })
        .collect();

    let employment = EmploymentProfile {
        metrics: RateMetric::ALL
            .iter()
            .map(|m| EmploymentMetric {
                metric: *m,
                local: LOCAL_RATES[m.index()],
                national: FALLBACK_BENCHMARKS[m.index()],
            })
            .collect(),
    };

    RadiusSummary {
        radius,
        label: radius_label(radius),
        estimated: true,
        member_count: 0,
        matched_count: 0,
        population,
        households,
        families,
        average_household_size: ratio(population, households),
        median_income: FALLBACK_MEDIAN_INCOME,
        per_capita_income: FALLBACK_PER_CAPITA_INCOME,
        age,
        age_prior: AgeCohorts::default(),
        age_share: AgeCohorts(age.0.map(|c| share_percent(c, population))),
        income,
        income_share: IncomeBrackets(income.0.map(|b| share_percent(b, households))),
        housing: HousingStats {
            total_units: (base * HOUSING_UNITS_PER_RESIDENT).round(),
            median_value: FALLBACK_HOME_VALUE,
            median_rent: FALLBACK_RENT,
        },
        employment,
        projections,
        age_shift: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeCohort, IncomeBracket};
    use approx::assert_relative_eq;

    #[test]
    fn test_estimate_one_mile() {
        let s = estimate_for_radius(1.0);
        assert!(s.estimated);
        assert_eq!(s.label, "1mile");
        assert_eq!(s.population, 15000.0);
        assert_eq!(s.households, 5250.0);
        assert_eq!(s.families, 3450.0);
        assert_eq!(s.median_income, 65000.0);
        assert_eq!(s.per_capita_income, 38000.0);
        assert_eq!(s.age.get(AgeCohort::Under18), 2355.0);
        assert_eq!(s.income.get(IncomeBracket::Under25k), 672.0);
        assert_eq!(s.housing.total_units, 5700.0);
        assert_eq!(s.housing.median_value, 285000.0);
        assert_eq!(s.housing.median_rent, 1450.0);
    }

    #[test]
    fn test_estimate_counts_are_whole_numbers() {
        for radius in [1.1, 2.5, 0.3, 7.75] {
            let s = estimate_for_radius(radius);
            let counts = [s.population, s.households, s.families, s.housing.total_units]
                .into_iter()
                .chain(s.age.0)
                .chain(s.income.0);
            for count in counts {
                assert_eq!(count, count.round(), "radius {}: {}", radius, count);
            }
        }

        let s = estimate_for_radius(1.1);
        assert_eq!(s.age.get(AgeCohort::Under18), 2591.0);
        assert_eq!(s.income.get(IncomeBracket::Under25k), 739.0);
        assert_eq!(estimate_for_radius(2.5).age.get(AgeCohort::Under18), 5888.0);
    }

    #[test]
    fn test_estimate_employment_and_projection() {
        let s = estimate_for_radius(3.0);
        assert_eq!(s.population, 45000.0);

        let lfpr = s.employment.get(RateMetric::LaborForceParticipation).unwrap();
        assert_eq!(lfpr.local, 63.5);
        assert_eq!(lfpr.national, 63.4);
        let unemployment = s.employment.get(RateMetric::Unemployment).unwrap();
        assert_eq!(unemployment.local, 3.8);
        assert_eq!(unemployment.national, 3.7);

        let pop = s.projection(Series::Population).unwrap();
        assert_eq!(pop.projected, 48600.0);
        assert_relative_eq!(pop.percent_change, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        assert_eq!(estimate_for_radius(2.5), estimate_for_radius(2.5));
        assert_eq!(estimate_for_radius(2.5).population, 37500.0);
    }
}
