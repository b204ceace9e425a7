//! Running reward statistics.

use serde::{Deserialize, Serialize};

/// Weighted running mean and squared deviations (Welford's method).
///
/// `weight` includes prior pseudo-observations; `count` only counts real
/// observations accepted after creation.
///
/// # Example
///
/// ```
/// use comboforge_bandit::RunningVariance;
///
/// let mut stats = RunningVariance::default();
/// for x in [2.0, 4.0, 6.0] {
///     stats.accept(x, 1.0);
/// }
/// assert_eq!(stats.mean(), 4.0);
/// assert_eq!(stats.count(), 3);
/// assert!((stats.variance() - 8.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningVariance {
    mean: f64,
    squared_deviations: f64,
    weight: f64,
    count: u64,
}

impl RunningVariance {
    /// Creates statistics worth `weight` pseudo-observations.
    pub fn new(mean: f64, squared_deviations: f64, weight: f64) -> Self {
        Self {
            mean,
            squared_deviations,
            weight,
            count: 0,
        }
    }

    /// Adds one observation with the given weight.
    ///
    /// Observations with a non-positive weight are ignored.
    pub fn accept(&mut self, value: f64, weight: f64) {
        if !(weight > 0.0) {
            return;
        }
        let total = self.weight + weight;
        if self.weight <= 0.0 {
            self.mean = value;
            self.squared_deviations = 0.0;
        } else {
            let delta = value - self.mean;
            self.mean += delta * weight / total;
            self.squared_deviations += weight * delta * (value - self.mean);
        }
        self.weight = total;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn squared_deviations(&self) -> f64 {
        self.squared_deviations
    }

    /// Total weight, prior included.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of observations accepted.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Weighted sum of observations, `mean * weight`.
    pub fn sum(&self) -> f64 {
        self.mean * self.weight
    }

    /// Population variance; zero without weight.
    pub fn variance(&self) -> f64 {
        if self.weight > 0.0 {
            self.squared_deviations / self.weight
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
