//! Cohort-level age shift projection.

use super::stats::share_percent;
use crate::models::{AgeCohort, AgeCohorts, AgeShiftProjection, CohortShift, Trend};

/// Share shifts within ±0.1 percentage points are reported as neutral.
pub const TREND_DEAD_BAND: f64 = 0.1;

/// Compound annual growth rate between two snapshots `span_years` apart.
///
/// Zero when either snapshot is non-positive or the span is not positive.
pub fn cohort_cagr(current: f64, prior: f64, span_years: f64) -> f64 {
    if current <= 0.0 || prior <= 0.0 || span_years <= 0.0 {
        return 0.0;
    }
    (current / prior).powf(1.0 / span_years) - 1.0
}

/// `current × (1 + cagr)^horizon`, rounded to a whole count.
pub fn project_count(current: f64, cagr: f64, horizon_years: u32) -> f64 {
    let horizon = i32::try_from(horizon_years).unwrap_or(i32::MAX);
    (current * (1.0 + cagr).powi(horizon)).round()
}

pub fn classify_trend(delta_points: f64) -> Trend {
    if delta_points > TREND_DEAD_BAND {
        Trend::Positive
    } else if delta_points < -TREND_DEAD_BAND {
        Trend::Negative
    } else {
        Trend::Neutral
    }
}

/// Project each cohort forward by its own CAGR and compare shares.
///
/// Shares are taken against the cohort totals rather than the population
/// count, so both snapshots always sum to 100.
pub fn project_age_shift(
    current: &AgeCohorts,
    prior: &AgeCohorts,
    span_years: f64,
    horizon_years: u32,
) -> AgeShiftProjection {
    let rows: Vec<(AgeCohort, f64, f64, f64, f64)> = AgeCohort::ALL
        .iter()
        .map(|cohort| {
            let now = current.get(*cohort);
            let then = prior.get(*cohort);
            let cagr = cohort_cagr(now, then, span_years);
            (*cohort, now, then, cagr, project_count(now, cagr, horizon_years))
        })
        .collect();

    let total_current = current.total();
    let total_projected: f64 = rows.iter().map(|r| r.4).sum();

    let cohorts = rows
        .into_iter()
        .map(|(cohort, now, then, cagr, projected)| {
            let share_current = share_percent(now, total_current);
            let share_projected = share_percent(projected, total_projected);
            let delta_points = share_projected - share_current;
            CohortShift {
                cohort,
                current: now,
                prior: then,
                cagr,
                projected,
                share_current,
                share_projected,
                delta_points,
                trend: classify_trend(delta_points),
            }
        })
        .collect();

    AgeShiftProjection {
        span_years,
        horizon_years,
        total_current,
        total_projected,
        cohorts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cohort_cagr_and_projection() {
        let cagr = cohort_cagr(1200.0, 1000.0, 5.0);
        assert_relative_eq!(cagr, 0.0371, epsilon = 1e-4);
        assert_eq!(project_count(1200.0, cagr, 5), 1440.0);
    }

    #[test]
    fn test_cagr_zero_on_missing_snapshot() {
        assert_eq!(cohort_cagr(1200.0, 0.0, 5.0), 0.0);
        assert_eq!(cohort_cagr(0.0, 1000.0, 5.0), 0.0);
        assert_eq!(cohort_cagr(1200.0, 1000.0, 0.0), 0.0);
        assert_eq!(project_count(800.0, 0.0, 5), 800.0);
    }

    #[test]
    fn test_trend_dead_band() {
        assert_eq!(classify_trend(0.1), Trend::Neutral);
        assert_eq!(classify_trend(-0.1), Trend::Neutral);
        assert_eq!(classify_trend(0.11), Trend::Positive);
        assert_eq!(classify_trend(-0.5), Trend::Negative);
    }

    #[test]
    fn test_age_shift_shares() {
        let current = AgeCohorts([1000.0, 1000.0, 1000.0, 1000.0, 1200.0]);
        let prior = AgeCohorts([1000.0, 1000.0, 1000.0, 1000.0, 1000.0]);
        let shift = project_age_shift(&current, &prior, 5.0, 5);

        assert_eq!(shift.total_current, 5200.0);
        assert_eq!(shift.total_projected, 4000.0 + 1440.0);
        let sum_now: f64 = shift.cohorts.iter().map(|c| c.share_current).sum();
        let sum_then: f64 = shift.cohorts.iter().map(|c| c.share_projected).sum();
        assert_relative_eq!(sum_now, 100.0, epsilon = 1e-9);
        assert_relative_eq!(sum_then, 100.0, epsilon = 1e-9);

        let seniors = &shift.cohorts[AgeCohort::Age65Plus.index()];
        assert_eq!(seniors.projected, 1440.0);
        assert_eq!(seniors.trend, Trend::Positive);
        assert_eq!(shift.cohorts[0].trend, Trend::Negative);
    }

    #[test]
    fn test_age_shift_empty_cohorts() {
        let shift = project_age_shift(&AgeCohorts::default(), &AgeCohorts::default(), 5.0, 5);
        assert_eq!(shift.total_projected, 0.0);
        assert!(shift
            .cohorts
            .iter()
            .all(|c| c.share_current == 0.0 && c.trend == Trend::Neutral));
    }
}
