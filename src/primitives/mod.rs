//! Portable reference kernels
//!
//! CPU implementations of the benchmarked primitives: 2-D convolution
//! forward and cross-channel Local Response Normalization forward and
//! backward. These are direct (non-blocked) implementations; their job is
//! to be a correct, self-contained workload for the timing protocol, not
//! to compete with vendor kernels.

mod conv;
mod lrn;

pub use conv::conv2d_forward;
pub use lrn::LocalResponseNorm;
