//! Latency statistics over benchmark samples

use serde::{Deserialize, Serialize};

/// Summary latency statistics for a set of duration samples
///
/// Percentiles use the nearest-rank method on the sorted samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyStatistics {
    /// Mean latency in microseconds
    pub mean_us: f64,
    /// Sample standard deviation in microseconds
    pub std_dev_us: f64,
    /// Minimum latency in microseconds
    pub min_us: f64,
    /// Maximum latency in microseconds
    pub max_us: f64,
    /// 50th percentile (median)
    pub p50_us: f64,
    /// 95th percentile
    pub p95_us: f64,
    /// 99th percentile
    pub p99_us: f64,
    /// Number of samples
    pub samples: usize,
}

impl LatencyStatistics {
    /// Compute statistics from a slice of microsecond samples
    ///
    /// # Panics
    ///
    /// Panics if `samples` is empty
    #[must_use]
    pub fn from_samples_us(samples: &[f64]) -> Self {
        assert!(!samples.is_empty(), "samples must not be empty");

        let n = samples.len();
        let n_f64 = n as f64;

        let mean_us = samples.iter().sum::<f64>() / n_f64;

        let variance = samples
            .iter()
            .map(|s| {
                let diff = s - mean_us;
                diff * diff
            })
            .sum::<f64>()
            / (n_f64 - 1.0).max(1.0);
        let std_dev_us = variance.sqrt();

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let min_us = sorted[0];
        let max_us = sorted[n - 1];

        // Nearest-rank percentile
        let percentile = |p: f64| -> f64 {
            let idx = ((p / 100.0) * n_f64).ceil() as usize;
            sorted[idx.saturating_sub(1).min(n - 1)]
        };

        Self {
            mean_us,
            std_dev_us,
            min_us,
            max_us,
            p50_us: percentile(50.0),
            p95_us: percentile(95.0),
            p99_us: percentile(99.0),
            samples: n,
        }
    }
}
