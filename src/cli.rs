//! CLI command implementations
//!
//! This module contains the argument types and the business logic for the
//! CLI commands, extracted from main.rs for testability.

// CLI glue code - relaxed lint requirements
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_arguments)]

use clap::{Parser, Subcommand};

use crate::backend::CpuBackend;
use crate::bench::BenchmarkConfig;
use crate::desc::{ConvDesc, FilterDesc, LrnDesc, TensorDesc};
use crate::error::{MedirError, Result};
use crate::harness::{CaseReport, LrnBackwardCase};

/// Medir - benchmark harness for neural-network primitives
///
/// Times a convolution + LRN workload under a warm-up-then-average
/// protocol and reports per-iteration latency statistics.
#[derive(Debug, Parser)]
#[command(name = "medir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the conv + LRN-backward benchmark
    ///
    /// Examples:
    ///   medir bench
    ///   medir bench --channels 8 --height 64 --width 64 --iterations 200
    ///   medir bench --lrn-n 5 --lrn-alpha 1e-4 --lrn-beta 0.75 --lrn-k 2 --format json
    Bench {
        /// Batch size (N)
        #[arg(long, default_value_t = 1)]
        batch: usize,

        /// Input channels (C)
        #[arg(long, default_value_t = 3)]
        channels: usize,

        /// Input height (H)
        #[arg(long, default_value_t = 32)]
        height: usize,

        /// Input width (W)
        #[arg(long, default_value_t = 32)]
        width: usize,

        /// Number of convolution filters (output channels)
        #[arg(long, default_value_t = 16)]
        filters: usize,

        /// Square kernel size
        #[arg(long, default_value_t = 3)]
        kernel: usize,

        /// Zero-padding on both spatial axes
        #[arg(long, default_value_t = 0)]
        pad: usize,

        /// Stride on both spatial axes
        #[arg(long, default_value_t = 1)]
        stride: usize,

        /// LRN cross-channel window size
        #[arg(long = "lrn-n", default_value_t = 1)]
        lrn_n: usize,

        /// LRN alpha
        #[arg(long = "lrn-alpha", default_value_t = 1.0)]
        lrn_alpha: f64,

        /// LRN beta
        #[arg(long = "lrn-beta", default_value_t = 1.0)]
        lrn_beta: f64,

        /// LRN k
        #[arg(long = "lrn-k", default_value_t = 1.0)]
        lrn_k: f64,

        /// Total timed iterations
        #[arg(short = 'i', long, default_value_t = 100)]
        iterations: usize,

        /// Warm-up iterations excluded from the mean
        #[arg(short = 'w', long, default_value_t = 10)]
        warmup: usize,

        /// Seed for the synthetic tensor data
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Show version and available backends
    Info,
}

/// Main CLI entrypoint - dispatches commands to handlers
pub fn entrypoint(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Bench {
            batch,
            channels,
            height,
            width,
            filters,
            kernel,
            pad,
            stride,
            lrn_n,
            lrn_alpha,
            lrn_beta,
            lrn_k,
            iterations,
            warmup,
            seed,
            format,
        } => {
            let report = run_bench_case(
                batch, channels, height, width, filters, kernel, pad, stride, lrn_n, lrn_alpha,
                lrn_beta, lrn_k, iterations, warmup, seed,
            )?;
            print_report(&report, &format)
        },
        Commands::Info => {
            handle_info();
            Ok(())
        },
    }
}

/// Build and run one benchmark case from CLI parameters
pub fn run_bench_case(
    batch: usize,
    channels: usize,
    height: usize,
    width: usize,
    filters: usize,
    kernel: usize,
    pad: usize,
    stride: usize,
    lrn_n: usize,
    lrn_alpha: f64,
    lrn_beta: f64,
    lrn_k: f64,
    iterations: usize,
    warmup: usize,
    seed: u64,
) -> Result<CaseReport> {
    let input = TensorDesc::new(batch, channels, height, width)?;
    let filter = FilterDesc::new(filters, channels, kernel, kernel)?;
    let conv = ConvDesc::new(pad, pad, stride, stride)?;
    let lrn = LrnDesc::new(lrn_n, lrn_alpha, lrn_beta, lrn_k)?;
    let case = LrnBackwardCase::new(input, filter, conv, lrn)?.with_seed(seed);

    let config = BenchmarkConfig::new(iterations, warmup);
    case.run(&CpuBackend::new(), &config)
}

fn print_report(report: &CaseReport, format: &str) -> Result<()> {
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(report).map_err(|err| {
                MedirError::InvalidConfiguration(format!("Failed to serialize report: {err}"))
            })?;
            println!("{json}");
        },
        "text" => {
            let stats = &report.statistics;
            println!("LRN backward benchmark ({})", report.backend);
            println!(
                "  input   : {}x{}x{}x{} (NCHW)",
                report.input.n, report.input.c, report.input.h, report.input.w
            );
            println!(
                "  filter  : {}x{}x{}x{}, pad {}, stride {}",
                report.filter.k,
                report.filter.c,
                report.filter.h,
                report.filter.w,
                report.conv.pad_h,
                report.conv.stride_h
            );
            println!(
                "  lrn     : n={} alpha={} beta={} k={}",
                report.lrn.n, report.lrn.alpha, report.lrn.beta, report.lrn.k
            );
            println!(
                "  output  : {}x{}x{}x{}",
                report.output.n, report.output.c, report.output.h, report.output.w
            );
            println!(
                "  samples : {} measured ({} warm-up discarded)",
                stats.samples, report.config.warmup
            );
            println!("  mean    : {:.3} us", report.mean_us);
            println!(
                "  min/max : {:.3} / {:.3} us   p50 {:.3}   p95 {:.3}   p99 {:.3}",
                stats.min_us, stats.max_us, stats.p50_us, stats.p95_us, stats.p99_us
            );
        },
        other => {
            return Err(MedirError::InvalidConfiguration(format!(
                "Unknown output format '{other}' (expected 'text' or 'json')"
            )));
        },
    }
    Ok(())
}

fn handle_info() {
    println!("medir {}", crate::VERSION);
    println!("backends: cpu");
}
