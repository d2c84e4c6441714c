//! # Medir
//!
//! Pure Rust benchmark harness for neural-network primitives.
//!
//! Medir (Spanish: "to measure") times a fixed operation a configured number
//! of times on a compute backend, enforces a synchronization barrier after
//! every iteration so that samples reflect completed-work latency, discards
//! a warm-up prefix, and reports the mean plus summary latency statistics.
//!
//! The reference workload is the classic convolution + LRN stack: a 2-D
//! convolution forward pass feeds a cross-channel Local Response
//! Normalization forward pass, and the LRN backward pass is the timed
//! operation. The kernels are portable CPU implementations; accelerator
//! backends plug in behind the [`backend::ComputeBackend`] seam.
//!
//! ## Example
//!
//! ```
//! use medir::backend::CpuBackend;
//! use medir::bench::{BenchmarkConfig, BenchmarkRunner};
//!
//! let runner = BenchmarkRunner::new(BenchmarkConfig::default().with_iterations(20));
//! let mut acc = 0.0f64;
//! let result = runner
//!     .run(&CpuBackend::new(), || {
//!         acc += 1.0;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(result.samples_us.len(), 20);
//! assert!(result.mean_us >= 0.0);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Clippy allows (MUST come after deny/warn to override them)
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // usize -> f64 for statistics is acceptable
#![allow(clippy::must_use_candidate)] // Not all methods need #[must_use]
#![allow(clippy::missing_panics_doc)] // Allow missing Panics doc sections
#![allow(clippy::uninlined_format_args)] // Prefer explicit format args
#![allow(clippy::doc_markdown)] // Allow technical terms without backticks

/// Compute backend seam: execution context plus the synchronization barrier
pub mod backend;
/// Benchmark timing protocol and latency statistics
pub mod bench;
/// CLI command implementations (extracted for testability)
pub mod cli;
/// Descriptor layer: validated tensor, filter, convolution, and LRN parameters
pub mod desc;
pub mod error;
/// End-to-end conv + LRN benchmark cases
pub mod harness;
/// Portable reference kernels (conv2d forward, LRN forward/backward)
pub mod primitives;
pub mod tensor;

// Re-exports for convenience
pub use error::{MedirError, Result};
pub use tensor::Tensor;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
        assert!(VERSION.contains('.'));
    }
}
