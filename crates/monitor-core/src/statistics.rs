//! Single-pass summary statistics.
//!
//! Uses [Welford's online algorithm](https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford's_online_algorithm)
//! so a bucket's mean and variance are available after one traversal,
//! without storing the observations.

use crate::models::SummaryStats;

/// Running count, mean and sum of squared deviations (`M2`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running totals.
    ///
    /// `mean' = mean + (x - mean) / n`
    /// `M2'   = M2 + (x - mean) * (x - mean')`
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let prev_mean = self.mean;
        self.mean += (value - prev_mean) / self.count as f64;
        self.m2 += (value - prev_mean) * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, `NaN` when no values were pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Unbiased variance (denominator `N - 1`), `NaN` below two values.
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation, `NaN` below two values.
    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats {
            count: self.count,
            mean: self.mean(),
            std_dev: self.sample_std_dev(),
        }
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
