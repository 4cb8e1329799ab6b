//! Metrics aggregation and ranking engine
//!
//! The core of the crate: reduces heterogeneous raw per-task results into
//! normalized, comparable, weighted scores and a strict total order over
//! models.
//!
//! ## Architecture
//!
//! - `filter`: per-task normalization of raw error metrics against weights
//! - `domain`: weighted exponential / linear averaging into domain scores
//! - `stability`: NVE drift → instability with an explicit failure penalty
//! - `efficiency`: pooled inference timing with all-or-nothing coverage
//! - `ranking`: four-key lexicographic sort with missing-last semantics
//! - `calculator`: assembly of the four composite leaderboard columns
//!
//! Everything here is pure computation over in-memory data; determinism for
//! identical input is a hard requirement, hence ordered maps throughout.

pub mod calculator;
pub mod domain;
pub mod efficiency;
pub mod filter;
pub mod ranking;
pub mod stability;

pub use calculator::{DomainScores, MetricsCalculator};
pub use domain::{exp_average, linear_average};
pub use efficiency::{aggregate_efficiency, efficiency_score, EfficiencyAggregate};
pub use filter::{filter_force_field_result, FilteredResult, NormalizationMode};
pub use ranking::{rank, FinalRankingRow, RankedRow};
pub use stability::{aggregate_stability, instability, FAILURE_PENALTY};
