//! evaluar CLI
//!
//! Aggregates raw benchmark records into model rankings.
//!
//! ```bash
//! # Aggregate records into rankings
//! evaluar aggregate --config benchmark.yml --records records.json --out results
//!
//! # Aggregate as of a past instant
//! evaluar aggregate --config benchmark.yml --records records.json \
//!     --as-of 2026-06-01T00:00:00Z
//!
//! # Validate a configuration
//! evaluar validate --config benchmark.yml
//! ```

use clap::Parser;
use evaluar::cli::{init_tracing, run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
