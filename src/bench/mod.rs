//! Benchmark timing protocol
//!
//! Runs a timed operation a fixed number of times on a compute backend,
//! with a synchronization barrier after every iteration, and averages the
//! per-iteration wall-clock durations after discarding a warm-up prefix.
//!
//! The protocol is deliberately fixed-N/fixed-W: no retries, no dynamic
//! stop rules, no partial results. A failed operation or barrier aborts
//! the run with the matching error.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::backend::ComputeBackend;
use crate::error::{MedirError, Result};

mod statistics;

pub use statistics::LatencyStatistics;

/// Benchmark iteration configuration
///
/// `iterations` is the total number of timed invocations; the first
/// `warmup` samples are recorded but excluded from the mean. The warm-up
/// count is configurable rather than a fixed offset; 10 is the
/// conventional default for this workload family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Total number of timed iterations (N)
    pub iterations: usize,
    /// Number of leading iterations excluded from the mean (W)
    pub warmup: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            warmup: 10,
        }
    }
}

impl BenchmarkConfig {
    /// Create a config with the given iteration and warm-up counts
    #[must_use]
    pub fn new(iterations: usize, warmup: usize) -> Self {
        Self { iterations, warmup }
    }

    /// Set the total iteration count
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the warm-up count
    #[must_use]
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Number of iterations contributing to the mean
    #[must_use]
    pub fn measured_iterations(&self) -> usize {
        self.iterations.saturating_sub(self.warmup)
    }

    /// Validate the `0 <= warmup < iterations` constraint
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `iterations` is zero or
    /// `warmup >= iterations`. The runner checks this before the first
    /// iteration, so an invalid config never executes the operation.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(MedirError::InvalidConfiguration(
                "iterations must be > 0".to_string(),
            ));
        }
        if self.warmup >= self.iterations {
            return Err(MedirError::InvalidConfiguration(format!(
                "warmup {} must be < iterations {}",
                self.warmup, self.iterations
            )));
        }
        Ok(())
    }
}

/// Outcome of a successful benchmark run
///
/// `samples_us` holds one entry per iteration in execution order,
/// including the warm-up prefix; `mean_us` averages only the measured
/// suffix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Per-iteration elapsed wall-clock time in microseconds
    pub samples_us: Vec<f64>,
    /// Arithmetic mean of `samples_us[warmup..]`
    pub mean_us: f64,
    /// The configuration the run used
    pub config: BenchmarkConfig,
}

impl BenchmarkResult {
    /// Samples contributing to the mean (warm-up excluded)
    #[must_use]
    pub fn measured_samples(&self) -> &[f64] {
        &self.samples_us[self.config.warmup..]
    }

    /// Summary statistics over the measured window
    #[must_use]
    pub fn statistics(&self) -> LatencyStatistics {
        LatencyStatistics::from_samples_us(self.measured_samples())
    }
}

/// Arithmetic mean of `samples[warmup..]`, computed in f64
///
/// # Errors
///
/// Returns `InvalidConfiguration` if the slice is empty or
/// `warmup >= samples.len()` (an empty measured window has no mean).
pub fn mean_after_warmup(samples: &[f64], warmup: usize) -> Result<f64> {
    if warmup >= samples.len() {
        return Err(MedirError::InvalidConfiguration(format!(
            "warmup {} leaves no measured samples out of {}",
            warmup,
            samples.len()
        )));
    }
    let measured = &samples[warmup..];
    Ok(measured.iter().sum::<f64>() / measured.len() as f64)
}

/// Executes a timed operation under the benchmark protocol
///
/// Per iteration: start the clock, invoke the operation, wait on the
/// backend's barrier, stop the clock. The clock starts immediately before
/// the operation and stops immediately after the barrier, so setup cost
/// outside the loop is never included and asynchronous work is always
/// drained before a sample is recorded.
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    /// Create a runner with the given configuration
    #[must_use]
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// The runner's configuration
    #[must_use]
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Run the operation `iterations` times and aggregate the timings
    ///
    /// The operation is opaque: it takes no arguments and returns no
    /// value. Any side effects (mutating buffers, device dispatch) are
    /// the caller's concern.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` before any iteration if the config is
    ///   invalid
    /// - `OperationFailure` if the operation fails; the run aborts
    ///   immediately with no result
    /// - `SynchronizationFailure` if the barrier fails; same fatality
    pub fn run<F>(&self, backend: &dyn ComputeBackend, mut op: F) -> Result<BenchmarkResult>
    where
        F: FnMut() -> Result<()>,
    {
        self.config.validate()?;

        let mut samples_us = Vec::with_capacity(self.config.iterations);
        for iteration in 0..self.config.iterations {
            let start = Instant::now();
            op().map_err(|err| match err {
                failure @ MedirError::OperationFailure { .. } => failure,
                other => MedirError::OperationFailure {
                    operation: format!("iteration {iteration}"),
                    reason: other.to_string(),
                },
            })?;
            backend.synchronize().map_err(|err| match err {
                failure @ MedirError::SynchronizationFailure { .. } => failure,
                other => MedirError::SynchronizationFailure {
                    backend: backend.name().to_string(),
                    reason: other.to_string(),
                },
            })?;
            samples_us.push(start.elapsed().as_secs_f64() * 1_000_000.0);
        }

        let mean_us = mean_after_warmup(&samples_us, self.config.warmup)?;
        Ok(BenchmarkResult {
            samples_us,
            mean_us,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_config_default() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.warmup, 10);
        assert_eq!(config.measured_iterations(), 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builders() {
        let config = BenchmarkConfig::default().with_iterations(12).with_warmup(2);
        assert_eq!(config.iterations, 12);
        assert_eq!(config.warmup, 2);
    }

    #[test]
    fn test_config_rejects_warmup_ge_iterations() {
        assert!(BenchmarkConfig::new(10, 10).validate().is_err());
        assert!(BenchmarkConfig::new(10, 11).validate().is_err());
        assert!(BenchmarkConfig::new(0, 0).validate().is_err());
        assert!(BenchmarkConfig::new(10, 9).validate().is_ok());
    }

    #[test]
    fn test_mean_after_warmup_worked_example() {
        // N=12, W=10: only the last two samples count
        let samples = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 100.0, 200.0];
        let mean = mean_after_warmup(&samples, 10).unwrap();
        assert!((mean - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_after_warmup_zero_warmup() {
        let samples = [1.0, 2.0, 3.0];
        let mean = mean_after_warmup(&samples, 0).unwrap();
        assert!((mean - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_after_warmup_empty_window() {
        assert!(mean_after_warmup(&[1.0, 2.0], 2).is_err());
        assert!(mean_after_warmup(&[], 0).is_err());
    }

    #[test]
    fn test_runner_records_every_iteration() {
        let runner = BenchmarkRunner::new(BenchmarkConfig::new(7, 3));
        let result = runner.run(&CpuBackend::new(), || Ok(())).unwrap();
        assert_eq!(result.samples_us.len(), 7);
        assert_eq!(result.measured_samples().len(), 4);
        assert!(result.samples_us.iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_runner_invalid_config_runs_nothing() {
        let runner = BenchmarkRunner::new(BenchmarkConfig::new(5, 5));
        let mut invocations = 0;
        let result = runner.run(&CpuBackend::new(), || {
            invocations += 1;
            Ok(())
        });
        assert!(matches!(
            result.unwrap_err(),
            MedirError::InvalidConfiguration(_)
        ));
        assert_eq!(invocations, 0);
    }
}
