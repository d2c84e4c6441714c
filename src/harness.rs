//! End-to-end benchmark cases
//!
//! A case mirrors the classic primitive-benchmark shape: untimed setup
//! (seeded data, a convolution forward pass, one LRN forward pass), then
//! the LRN backward pass handed to the runner as the timed operation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::backend::ComputeBackend;
use crate::bench::{BenchmarkConfig, BenchmarkRunner, LatencyStatistics};
use crate::desc::{ConvDesc, FilterDesc, LrnDesc, TensorDesc};
use crate::error::Result;
use crate::primitives::{conv2d_forward, LocalResponseNorm};
use crate::tensor::Tensor;

/// One conv + LRN-backward benchmark scenario
///
/// Construction validates the whole geometry, so a case that exists can
/// run. Input and filter data are pseudo-random from a fixed seed; the
/// same case always times the same numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LrnBackwardCase {
    /// Convolution input descriptor
    pub input: TensorDesc,
    /// Convolution filter descriptor
    pub filter: FilterDesc,
    /// Convolution geometry
    pub conv: ConvDesc,
    /// LRN parameters
    pub lrn: LrnDesc,
    /// Seed for the synthetic input and filter data
    pub seed: u64,
}

impl Default for LrnBackwardCase {
    fn default() -> Self {
        Self {
            input: TensorDesc {
                n: 1,
                c: 3,
                h: 32,
                w: 32,
            },
            filter: FilterDesc {
                k: 16,
                c: 3,
                h: 3,
                w: 3,
            },
            conv: ConvDesc::default(),
            lrn: LrnDesc::default(),
            seed: 42,
        }
    }
}

impl LrnBackwardCase {
    /// Create a case, validating that the geometry composes
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape`/`InvalidConfiguration` if the convolution
    /// output shape cannot be computed or the LRN parameters are out of
    /// bounds
    pub fn new(
        input: TensorDesc,
        filter: FilterDesc,
        conv: ConvDesc,
        lrn: LrnDesc,
    ) -> Result<Self> {
        conv.output_desc(&input, &filter)?;
        lrn.validate()?;
        Ok(Self {
            input,
            filter,
            conv,
            lrn,
            seed: 42,
        })
    }

    /// Set the data seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The convolution output descriptor (also the LRN tensor shape)
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if the geometry doesn't compose
    pub fn output_desc(&self) -> Result<TensorDesc> {
        self.conv.output_desc(&self.input, &self.filter)
    }

    /// Run the case: setup untimed, LRN backward timed
    ///
    /// # Errors
    ///
    /// Propagates kernel failures from setup, plus the runner's
    /// `InvalidConfiguration` / `OperationFailure` /
    /// `SynchronizationFailure`
    pub fn run(
        &self,
        backend: &dyn ComputeBackend,
        config: &BenchmarkConfig,
    ) -> Result<CaseReport> {
        config.validate()?;
        let output_desc = self.output_desc()?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let input = random_tensor(&mut rng, self.input.dims())?;
        let filter = random_tensor(&mut rng, self.filter.dims())?;

        // Untimed setup, as in the forward half of the pipeline
        let conv_out = conv2d_forward(&input, &filter, &self.conv)?;
        let lrn = LocalResponseNorm::new(self.lrn)?;
        let lrn_out = lrn.forward(&conv_out)?;
        let grad_output = random_tensor(&mut rng, output_desc.dims())?;

        let runner = BenchmarkRunner::new(*config);
        let result = runner.run(backend, || {
            let grad_input = lrn.backward(&conv_out, &lrn_out, &grad_output)?;
            std::hint::black_box(grad_input);
            Ok(())
        })?;

        let statistics = result.statistics();
        Ok(CaseReport {
            backend: backend.name().to_string(),
            input: self.input,
            filter: self.filter,
            conv: self.conv,
            lrn: self.lrn,
            output: output_desc,
            seed: self.seed,
            config: *config,
            mean_us: result.mean_us,
            statistics,
        })
    }
}

fn random_tensor(rng: &mut StdRng, dims: Vec<usize>) -> Result<Tensor<f32>> {
    let size: usize = dims.iter().product();
    let data: Vec<f32> = (0..size).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Tensor::from_vec(dims, data)
}

/// Serializable record of one completed case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Backend the case ran on
    pub backend: String,
    /// Convolution input descriptor
    pub input: TensorDesc,
    /// Convolution filter descriptor
    pub filter: FilterDesc,
    /// Convolution geometry
    pub conv: ConvDesc,
    /// LRN parameters
    pub lrn: LrnDesc,
    /// Shape the LRN passes operated on
    pub output: TensorDesc,
    /// Data seed the case used
    pub seed: u64,
    /// Benchmark configuration
    pub config: BenchmarkConfig,
    /// Mean timed-iteration latency in microseconds (warm-up excluded)
    pub mean_us: f64,
    /// Summary statistics over the measured window
    pub statistics: LatencyStatistics,
}
