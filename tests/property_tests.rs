//! Property-based tests using proptest
//!
//! Invariants of the benchmark protocol and the reference kernels:
//! - mean aggregation over the measured suffix
//! - runner sample counts for arbitrary valid configs
//! - convolution output geometry
//! - LRN forward boundedness

use medir::backend::CpuBackend;
use medir::bench::{mean_after_warmup, BenchmarkConfig, BenchmarkRunner};
use medir::desc::{ConvDesc, FilterDesc, LrnDesc, TensorDesc};
use medir::primitives::LocalResponseNorm;
use medir::Tensor;
use proptest::prelude::*;

proptest! {
    /// mean_after_warmup equals the naive mean of the measured suffix
    #[test]
    fn prop_mean_after_warmup_matches_naive(
        samples in prop::collection::vec(0.0f64..1e6, 1..64),
        warmup_frac in 0.0f64..1.0,
    ) {
        let warmup = ((samples.len() as f64) * warmup_frac) as usize;
        prop_assume!(warmup < samples.len());

        let mean = mean_after_warmup(&samples, warmup).unwrap();
        let suffix = &samples[warmup..];
        let naive = suffix.iter().sum::<f64>() / suffix.len() as f64;
        prop_assert!((mean - naive).abs() <= 1e-9 * naive.max(1.0));
    }

    /// warmup >= len always fails
    #[test]
    fn prop_mean_rejects_empty_window(
        samples in prop::collection::vec(0.0f64..1e6, 0..32),
        extra in 0usize..8,
    ) {
        prop_assert!(mean_after_warmup(&samples, samples.len() + extra).is_err());
    }

    /// A successful run always records exactly N samples, for any valid
    /// (N, W) pair
    #[test]
    fn prop_runner_sample_count(iterations in 1usize..40, warmup_frac in 0.0f64..1.0) {
        let warmup = ((iterations as f64) * warmup_frac) as usize;
        prop_assume!(warmup < iterations);

        let runner = BenchmarkRunner::new(BenchmarkConfig::new(iterations, warmup));
        let result = runner.run(&CpuBackend::new(), || Ok(())).unwrap();
        prop_assert_eq!(result.samples_us.len(), iterations);
        prop_assert_eq!(result.measured_samples().len(), iterations - warmup);
        prop_assert!(result.samples_us.iter().all(|&s| s >= 0.0));
    }

    /// With stride 1, no padding, and no dilation the output spatial size
    /// is input - kernel + 1
    #[test]
    fn prop_conv_output_dims_unit_stride(
        i in 1usize..64,
        k in 1usize..8,
        channels in 1usize..4,
        filters in 1usize..4,
    ) {
        prop_assume!(k <= i);
        let input = TensorDesc::new(1, channels, i, i).unwrap();
        let filter = FilterDesc::new(filters, channels, k, k).unwrap();
        let out = ConvDesc::default().output_desc(&input, &filter).unwrap();
        prop_assert_eq!(out.h, i - k + 1);
        prop_assert_eq!(out.w, i - k + 1);
        prop_assert_eq!(out.c, filters);
    }

    /// With k = 1 the LRN denominator is >= 1, so outputs never exceed
    /// inputs in magnitude and stay finite
    #[test]
    fn prop_lrn_forward_contracts_magnitudes(
        values in prop::collection::vec(-10.0f32..10.0, 16..=16),
        n in 1usize..6,
        beta in 0.01f64..2.0,
    ) {
        let lrn = LocalResponseNorm::new(LrnDesc::new(n, 1.0, beta, 1.0).unwrap()).unwrap();
        let input = Tensor::from_vec(vec![1, 4, 2, 2], values).unwrap();
        let out = lrn.forward(&input).unwrap();
        for (x, y) in input.data().iter().zip(out.data().iter()) {
            prop_assert!(y.is_finite());
            prop_assert!(y.abs() <= x.abs() + 1e-6);
        }
    }
}
