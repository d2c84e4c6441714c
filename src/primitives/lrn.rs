//! Cross-channel Local Response Normalization
//!
//! Normalizes each activation by a power of the summed squares of its
//! channel neighborhood:
//!
//! ```text
//! scale[c] = k + alpha/n * sum over j in window(c) of x[j]^2
//! y[c]     = x[c] * scale[c]^-beta
//! ```
//!
//! The window spans `n` adjacent channels, `(n-1)/2` behind and `n/2`
//! ahead, clamped at the channel bounds.
//!
//! # References
//!
//! Krizhevsky et al., "ImageNet Classification with Deep Convolutional
//! Neural Networks" (Section 3.3), NeurIPS 2012.

#![allow(clippy::cast_possible_truncation)] // f64 LRN constants -> f32 kernel math

use crate::desc::LrnDesc;
use crate::error::{MedirError, Result};
use crate::tensor::Tensor;

/// Cross-channel LRN layer with forward and backward passes
#[derive(Debug, Clone)]
pub struct LocalResponseNorm {
    desc: LrnDesc,
    /// Channels in the window before the center
    behind: usize,
    /// Channels in the window after the center
    ahead: usize,
}

impl LocalResponseNorm {
    /// Create an LRN layer from a validated descriptor
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the descriptor is out of bounds
    pub fn new(desc: LrnDesc) -> Result<Self> {
        desc.validate()?;
        let behind = (desc.n - 1) / 2;
        let ahead = desc.n - behind - 1;
        Ok(Self {
            desc,
            behind,
            ahead,
        })
    }

    /// The layer's descriptor
    #[must_use]
    pub fn desc(&self) -> &LrnDesc {
        &self.desc
    }

    /// Per-element normalization scale `k + alpha/n * sum(x^2)`
    fn scales(&self, x: &[f32], batches: usize, channels: usize, spatial: usize) -> Vec<f32> {
        let alpha_over_n = (self.desc.alpha / self.desc.n as f64) as f32;
        let k = self.desc.k as f32;

        let mut scale = vec![0.0f32; x.len()];
        for b in 0..batches {
            for c in 0..channels {
                let lo = c.saturating_sub(self.behind);
                let hi = (c + self.ahead).min(channels - 1);
                for s in 0..spatial {
                    let mut sum_sq = 0.0f32;
                    for j in lo..=hi {
                        let v = x[(b * channels + j) * spatial + s];
                        sum_sq += v * v;
                    }
                    scale[(b * channels + c) * spatial + s] = k + alpha_over_n * sum_sq;
                }
            }
        }
        scale
    }

    fn check_4d(t: &Tensor<f32>, what: &str) -> Result<()> {
        if t.ndim() != 4 {
            return Err(MedirError::InvalidShape {
                reason: format!("{what} must be 4-D (NCHW), got {:?}", t.shape()),
            });
        }
        Ok(())
    }

    /// Forward pass: `y = x * scale^-beta`
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if the input is not 4-D
    pub fn forward(&self, input: &Tensor<f32>) -> Result<Tensor<f32>> {
        Self::check_4d(input, "LRN input")?;
        let shape = input.shape();
        let (batches, channels) = (shape[0], shape[1]);
        let spatial = shape[2] * shape[3];
        let beta = self.desc.beta as f32;

        let x = input.data();
        let scale = self.scales(x, batches, channels, spatial);
        let output: Vec<f32> = x
            .iter()
            .zip(scale.iter())
            .map(|(&xi, &si)| xi * si.powf(-beta))
            .collect();

        Tensor::from_vec(shape.to_vec(), output)
    }

    /// Backward pass: gradient of the loss w.r.t. the LRN input
    ///
    /// Given the forward input `x`, forward output `y`, and the gradient
    /// `dy` flowing back into the layer:
    ///
    /// ```text
    /// dx[c] = dy[c] * scale[c]^-beta
    ///       - 2*alpha*beta/n * x[c] * sum over j with c in window(j) of
    ///             dy[j] * y[j] / scale[j]
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if any tensor is not 4-D or the three
    /// shapes disagree
    pub fn backward(
        &self,
        input: &Tensor<f32>,
        output: &Tensor<f32>,
        grad_output: &Tensor<f32>,
    ) -> Result<Tensor<f32>> {
        Self::check_4d(input, "LRN input")?;
        if output.shape() != input.shape() || grad_output.shape() != input.shape() {
            return Err(MedirError::InvalidShape {
                reason: format!(
                    "LRN backward shapes disagree: input {:?}, output {:?}, grad {:?}",
                    input.shape(),
                    output.shape(),
                    grad_output.shape()
                ),
            });
        }

        let shape = input.shape();
        let (batches, channels) = (shape[0], shape[1]);
        let spatial = shape[2] * shape[3];
        let beta = self.desc.beta as f32;
        let ratio = (2.0 * self.desc.alpha * self.desc.beta / self.desc.n as f64) as f32;

        let x = input.data();
        let y = output.data();
        let dy = grad_output.data();
        let scale = self.scales(x, batches, channels, spatial);

        let mut dx = vec![0.0f32; x.len()];
        for b in 0..batches {
            for c in 0..channels {
                // c contributes to every window centered in [c-ahead, c+behind]
                let lo = c.saturating_sub(self.ahead);
                let hi = (c + self.behind).min(channels - 1);
                for s in 0..spatial {
                    let idx = (b * channels + c) * spatial + s;
                    let mut cross = 0.0f32;
                    for j in lo..=hi {
                        let jdx = (b * channels + j) * spatial + s;
                        cross += dy[jdx] * y[jdx] / scale[jdx];
                    }
                    dx[idx] = dy[idx] * scale[idx].powf(-beta) - ratio * x[idx] * cross;
                }
            }
        }

        Tensor::from_vec(shape.to_vec(), dx)
    }
}
