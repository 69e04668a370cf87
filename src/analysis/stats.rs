//! Small numeric accumulators and guarded arithmetic.
//!
//! Every division in the aggregation path goes through one of these so that
//! no summary field can become NaN or infinite.

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn add(&mut self, value: f64) {
        if value.is_finite() {
            self.sum += value;
            self.count += 1;
        }
    }

    /// Add only strictly positive values (zero means "missing" for medians).
    pub fn add_positive(&mut self, value: f64) {
        if value > 0.0 {
            self.add(value);
        }
    }

    /// Add only non-zero values (growth rates may be negative).
    pub fn add_nonzero(&mut self, value: f64) {
        if value != 0.0 {
            self.add(value);
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the added values, `None` when nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Running weighted mean Σ(value×weight)/Σ(weight).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMean {
    weighted_sum: f64,
    weight_sum: f64,
}

impl WeightedMean {
    pub fn add(&mut self, value: f64, weight: f64) {
        if value.is_finite() && weight.is_finite() && weight > 0.0 {
            self.weighted_sum += value * weight;
            self.weight_sum += weight;
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight_sum
    }

    pub fn mean(&self) -> Option<f64> {
        (self.weight_sum > 0.0).then(|| self.weighted_sum / self.weight_sum)
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `numerator / denominator`, or zero when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Percent share of `part` in `whole`, zero when `whole` is not positive.
pub fn share_percent(part: f64, whole: f64) -> f64 {
    ratio(part, whole) * 100.0
}

/// (projected - current) / current × 100, zero when `current` is not positive.
pub fn percent_change(current: f64, projected: f64) -> f64 {
    if current <= 0.0 {
        return 0.0;
    }
    (projected - current) / current * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_accumulator_filters() {
        let mut mean = MeanAccumulator::default();
        assert_eq!(mean.mean(), None);

        mean.add_positive(50000.0);
        mean.add_positive(0.0);
        mean.add_positive(-1.0);
        mean.add_positive(70000.0);
        assert_eq!(mean.count(), 2);
        assert_eq!(mean.mean(), Some(60000.0));

        let mut growth = MeanAccumulator::default();
        growth.add_nonzero(0.02);
        growth.add_nonzero(0.0);
        growth.add_nonzero(-0.01);
        assert_relative_eq!(growth.mean().unwrap(), 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_mean() {
        let mut w = WeightedMean::default();
        assert_eq!(w.mean(), None);
        w.add(60.0, 1000.0);
        w.add(70.0, 3000.0);
        assert_relative_eq!(w.mean().unwrap(), 67.5, epsilon = 1e-9);
        assert_eq!(w.weight(), 4000.0);

        w.add(f64::NAN, 10.0);
        w.add(90.0, 0.0);
        assert_relative_eq!(w.mean().unwrap(), 67.5, epsilon = 1e-9);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(63.44, 1), 63.4);
        assert_eq!(round_to(63.46, 1), 63.5);
        assert_eq!(round_to(1439.6, 0), 1440.0);
    }

    #[test]
    fn test_guarded_division() {
        assert_eq!(ratio(10.0, 0.0), 0.0);
        assert_eq!(ratio(10.0, -2.0), 0.0);
        assert_eq!(share_percent(25.0, 100.0), 25.0);
        assert_eq!(percent_change(0.0, 100.0), 0.0);
        assert_eq!(percent_change(-5.0, 100.0), 0.0);
        assert_relative_eq!(percent_change(60000.0, 66000.0), 10.0, epsilon = 1e-9);
        assert_relative_eq!(percent_change(100.0, 90.0), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_percent_change_without_projection_is_full_decline() {
        assert_eq!(percent_change(60000.0, 0.0), -100.0);
    }
}
