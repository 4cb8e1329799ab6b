//! evaluar — benchmark aggregation and ranking for large atomistic models
//!
//! Ingests heterogeneous raw per-task results (energy/force/virial errors,
//! MD stability traces, inference timing, property-prediction errors) and
//! reduces them into normalized, weighted scores producing a total ordering
//! over models across two composite axes: generalizability and
//! applicability.
//!
//! The engine is a batch, offline pass over in-memory data, single-threaded
//! and deterministic; how the raw results were computed and where they are
//! stored are collaborator concerns behind the
//! [`RecordSource`](records::RecordSource) trait.
//!
//! ```no_run
//! use evaluar::config::BenchmarkConfig;
//! use evaluar::records::JsonRecordSource;
//!
//! # fn main() -> evaluar::error::Result<()> {
//! let config = BenchmarkConfig::from_yaml_file("benchmark.yml")?;
//! let source = JsonRecordSource::from_json_file("records.json")?;
//! let output = evaluar::run_aggregation(&config, &source, None)?;
//! output.write_to_dir("results")?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod models;
pub mod output;
pub mod records;

pub use config::{BenchmarkConfig, Domain};
pub use error::{Error, Result};
pub use fetcher::{ModelResults, ResultsFetcher};
pub use metrics::{FinalRankingRow, MetricsCalculator, RankedRow};
pub use models::{ModelFamily, ModelSpec};
pub use output::{AggregationOutput, RankingTable};
pub use records::{JsonRecordSource, RecordSet, RecordSource};

use chrono::{DateTime, Utc};

/// Run one full aggregation pass: fetch and process every model's records,
/// assemble the composite scores, and rank.
pub fn run_aggregation<S: RecordSource>(
    config: &BenchmarkConfig,
    source: &S,
    as_of: Option<DateTime<Utc>>,
) -> Result<AggregationOutput> {
    config.validate()?;

    let mut fetcher = ResultsFetcher::new(source, config);
    if let Some(as_of) = as_of {
        fetcher = fetcher.with_as_of(as_of);
    }
    let results = fetcher.fetch_all()?;

    let calculator = MetricsCalculator::new(config);
    let final_rankings = calculator.summarize_final_rankings(&results);
    let barplot = calculator.barplot_data(&results);

    Ok(AggregationOutput {
        final_rankings,
        barplot,
        results,
    })
}
