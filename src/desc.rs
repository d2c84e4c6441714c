//! Descriptor layer
//!
//! Validated parameter structs for the benchmark workloads: tensor and
//! filter shapes in NCHW layout, convolution geometry, and LRN constants.
//! Each descriptor rejects invalid parameters at construction so kernels
//! can assume well-formed inputs.

use serde::{Deserialize, Serialize};

use crate::error::{MedirError, Result};

/// 4-D tensor descriptor in NCHW layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDesc {
    /// Batch size (N)
    pub n: usize,
    /// Channels (C)
    pub c: usize,
    /// Height (H)
    pub h: usize,
    /// Width (W)
    pub w: usize,
}

impl TensorDesc {
    /// Create a new NCHW tensor descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if any dimension is zero
    pub fn new(n: usize, c: usize, h: usize, w: usize) -> Result<Self> {
        if n == 0 || c == 0 || h == 0 || w == 0 {
            return Err(MedirError::InvalidShape {
                reason: format!("Tensor dimensions must be > 0, got {n}x{c}x{h}x{w}"),
            });
        }
        Ok(Self { n, c, h, w })
    }

    /// Total number of elements described
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.n * self.c * self.h * self.w
    }

    /// Shape as a vector, for tensor construction
    #[must_use]
    pub fn dims(&self) -> Vec<usize> {
        vec![self.n, self.c, self.h, self.w]
    }
}

/// Convolution filter descriptor: K output channels, C input channels,
/// kernel height and width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDesc {
    /// Number of output channels (K)
    pub k: usize,
    /// Number of input channels (C)
    pub c: usize,
    /// Kernel height
    pub h: usize,
    /// Kernel width
    pub w: usize,
}

impl FilterDesc {
    /// Create a new filter descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if any dimension is zero
    pub fn new(k: usize, c: usize, h: usize, w: usize) -> Result<Self> {
        if k == 0 || c == 0 || h == 0 || w == 0 {
            return Err(MedirError::InvalidShape {
                reason: format!("Filter dimensions must be > 0, got {k}x{c}x{h}x{w}"),
            });
        }
        Ok(Self { k, c, h, w })
    }

    /// Total number of filter elements
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.k * self.c * self.h * self.w
    }

    /// Shape as a vector, for tensor construction
    #[must_use]
    pub fn dims(&self) -> Vec<usize> {
        vec![self.k, self.c, self.h, self.w]
    }
}

/// 2-D convolution geometry: padding, stride, and dilation per spatial axis
///
/// Semantics are cross-correlation (no kernel flip), matching what GPU DNN
/// libraries compute for their "convolution" forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvDesc {
    /// Zero-padding along height
    pub pad_h: usize,
    /// Zero-padding along width
    pub pad_w: usize,
    /// Stride along height
    pub stride_h: usize,
    /// Stride along width
    pub stride_w: usize,
    /// Dilation along height
    pub dilation_h: usize,
    /// Dilation along width
    pub dilation_w: usize,
}

impl Default for ConvDesc {
    fn default() -> Self {
        Self {
            pad_h: 0,
            pad_w: 0,
            stride_h: 1,
            stride_w: 1,
            dilation_h: 1,
            dilation_w: 1,
        }
    }
}

impl ConvDesc {
    /// Create a convolution descriptor with the given padding and stride
    /// and no dilation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a stride is zero
    pub fn new(pad_h: usize, pad_w: usize, stride_h: usize, stride_w: usize) -> Result<Self> {
        let desc = Self {
            pad_h,
            pad_w,
            stride_h,
            stride_w,
            ..Self::default()
        };
        desc.validate()?;
        Ok(desc)
    }

    /// Set dilation along both spatial axes
    #[must_use]
    pub fn with_dilation(mut self, dilation_h: usize, dilation_w: usize) -> Self {
        self.dilation_h = dilation_h;
        self.dilation_w = dilation_w;
        self
    }

    /// Validate stride and dilation constraints
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a stride or dilation is zero
    pub fn validate(&self) -> Result<()> {
        if self.stride_h == 0 || self.stride_w == 0 {
            return Err(MedirError::InvalidConfiguration(format!(
                "Convolution stride must be >= 1, got {}x{}",
                self.stride_h, self.stride_w
            )));
        }
        if self.dilation_h == 0 || self.dilation_w == 0 {
            return Err(MedirError::InvalidConfiguration(format!(
                "Convolution dilation must be >= 1, got {}x{}",
                self.dilation_h, self.dilation_w
            )));
        }
        Ok(())
    }

    /// Compute the forward output descriptor for an input/filter pair
    ///
    /// The output spatial size along each axis is
    /// `(input + 2*pad - (dilation*(kernel-1) + 1)) / stride + 1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if the filter's input channels don't match
    /// the tensor's channels, or if the (dilated) kernel doesn't fit in
    /// the padded input.
    pub fn output_desc(&self, input: &TensorDesc, filter: &FilterDesc) -> Result<TensorDesc> {
        self.validate()?;

        if input.c != filter.c {
            return Err(MedirError::InvalidShape {
                reason: format!(
                    "Input channels {} don't match filter channels {}",
                    input.c, filter.c
                ),
            });
        }

        let effective_h = self.dilation_h * (filter.h - 1) + 1;
        let effective_w = self.dilation_w * (filter.w - 1) + 1;
        let padded_h = input.h + 2 * self.pad_h;
        let padded_w = input.w + 2 * self.pad_w;

        if effective_h > padded_h || effective_w > padded_w {
            return Err(MedirError::InvalidShape {
                reason: format!(
                    "Kernel {}x{} (dilated {}x{}) doesn't fit padded input {}x{}",
                    filter.h, filter.w, effective_h, effective_w, padded_h, padded_w
                ),
            });
        }

        let out_h = (padded_h - effective_h) / self.stride_h + 1;
        let out_w = (padded_w - effective_w) / self.stride_w + 1;

        TensorDesc::new(input.n, filter.k, out_h, out_w)
    }
}

/// Cross-channel LRN parameters: window size and normalization constants
///
/// The normalization denominator is `(k + alpha/n * sum(x^2))^beta` over a
/// window of `n` adjacent channels. Bounds mirror the descriptor
/// constraints of the GPU DNN libraries this workload originates from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LrnDesc {
    /// Cross-channel window size
    pub n: usize,
    /// Scaling constant applied to the window sum
    pub alpha: f64,
    /// Exponent of the normalization denominator
    pub beta: f64,
    /// Additive constant inside the denominator
    pub k: f64,
}

impl Default for LrnDesc {
    fn default() -> Self {
        Self {
            n: 1,
            alpha: 1.0,
            beta: 1.0,
            k: 1.0,
        }
    }
}

/// Largest cross-channel window the descriptor accepts
pub const LRN_MAX_N: usize = 16;

/// Smallest additive constant the descriptor accepts
pub const LRN_MIN_K: f64 = 1e-5;

/// Smallest exponent the descriptor accepts
pub const LRN_MIN_BETA: f64 = 0.01;

impl LrnDesc {
    /// Create an LRN descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any parameter is out of bounds;
    /// see [`LrnDesc::validate`]
    pub fn new(n: usize, alpha: f64, beta: f64, k: f64) -> Result<Self> {
        let desc = Self { n, alpha, beta, k };
        desc.validate()?;
        Ok(desc)
    }

    /// Validate parameter bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if:
    /// - `n` is zero or greater than [`LRN_MAX_N`]
    /// - `k` is below [`LRN_MIN_K`]
    /// - `beta` is below [`LRN_MIN_BETA`]
    /// - `alpha` is not finite
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 || self.n > LRN_MAX_N {
            return Err(MedirError::InvalidConfiguration(format!(
                "LRN window size must be in [1, {LRN_MAX_N}], got {}",
                self.n
            )));
        }
        if self.k.is_nan() || self.k < LRN_MIN_K {
            return Err(MedirError::InvalidConfiguration(format!(
                "LRN k must be >= {LRN_MIN_K}, got {}",
                self.k
            )));
        }
        if self.beta.is_nan() || self.beta < LRN_MIN_BETA {
            return Err(MedirError::InvalidConfiguration(format!(
                "LRN beta must be >= {LRN_MIN_BETA}, got {}",
                self.beta
            )));
        }
        if !self.alpha.is_finite() {
            return Err(MedirError::InvalidConfiguration(format!(
                "LRN alpha must be finite, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
