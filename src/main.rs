//! Medir CLI - benchmark harness for neural-network primitives
//!
//! # Commands
//!
//! - `bench` - Run the conv + LRN-backward benchmark
//! - `info` - Show version and available backends

use clap::Parser;
use medir::cli::{entrypoint, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = entrypoint(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
