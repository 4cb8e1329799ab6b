//! CLI command handlers

use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::output::RankingTable;
use crate::records::JsonRecordSource;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Benchmark aggregation and ranking for large atomistic models
#[derive(Debug, Parser)]
#[command(name = "evaluar", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Aggregate raw benchmark records into final rankings
    Aggregate {
        /// Benchmark configuration YAML
        #[arg(long)]
        config: PathBuf,
        /// Raw record set JSON
        #[arg(long)]
        records: PathBuf,
        /// Output directory for the result files
        #[arg(long, default_value = "results")]
        out: PathBuf,
        /// Only use records taken at or before this instant (RFC 3339)
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
    },
    /// Validate a configuration file without running aggregation
    Validate {
        /// Benchmark configuration YAML
        #[arg(long)]
        config: PathBuf,
    },
}

/// Install the log subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}

/// Run a parsed CLI command.
pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Aggregate {
            config,
            records,
            out,
            as_of,
        } => {
            let config = BenchmarkConfig::from_yaml_file(&config)?;
            let source = JsonRecordSource::from_json_file(&records)?;
            let output = crate::run_aggregation(&config, &source, as_of)?;
            output.write_to_dir(&out)?;
            println!("{}", RankingTable(&output.final_rankings));
            println!("Results written to {}", out.display());
            Ok(())
        }
        Commands::Validate { config } => {
            let config = BenchmarkConfig::from_yaml_file(&config)?;
            println!(
                "Configuration OK: {} force-field tasks, {} property tasks, {} MD structures",
                config.force_field_tasks.len(),
                config.property_tasks.len(),
                config.md_structures.len()
            );
            Ok(())
        }
    }
}
