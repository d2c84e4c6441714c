//! Compute backend abstraction
//!
//! The benchmark runner is backend-agnostic: it drives an opaque timed
//! operation and, after every iteration, calls the backend's
//! synchronization barrier so that the recorded duration reflects
//! completed work rather than queued work. Backends that dispatch
//! asynchronously (GPU streams, thread pools) must block in
//! [`ComputeBackend::synchronize`] until all previously submitted work has
//! finished.

use crate::error::Result;

/// Execution context for benchmarked operations
///
/// Implementations own whatever device or library state the operations
/// need; the runner only sees the name and the barrier. A backend is
/// acquired by the caller and passed explicitly, so its resources are
/// released when it is dropped.
pub trait ComputeBackend: Send + Sync {
    /// Short identifier for reports and error messages
    fn name(&self) -> &'static str;

    /// Block until all work submitted before this call has completed
    ///
    /// # Errors
    ///
    /// Returns `SynchronizationFailure` if the barrier cannot be
    /// established; the caller must treat the failure as fatal since
    /// timing integrity cannot be guaranteed afterward.
    fn synchronize(&self) -> Result<()>;
}

/// Portable CPU backend
///
/// All work on this backend executes synchronously on the calling thread,
/// so the barrier has nothing to wait for. It still participates in the
/// runner's per-iteration synchronize call, keeping the measured code path
/// identical across backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl CpuBackend {
    /// Create a new CPU backend
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn synchronize(&self) -> Result<()> {
        Ok(())
    }
}
