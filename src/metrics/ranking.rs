//! Final ranking
//!
//! Assembles one row per model and produces a strict total order via a
//! lexicographic multi-key sort: FF-Error ascending, PC-Error ascending,
//! Instability ascending, Efficiency descending. Missing values sort last
//! within their key in both directions — a model with no measurable score is
//! never ranked ahead of one with a measured, however poor, score. This is
//! an explicit comparator rule, not a language default.
//!
//! The sort is stable, so bit-identical score tuples keep their input order,
//! and every invocation recomputes the full order from scratch.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One leaderboard row: a model and its four composite scores
///
/// Field names serialize to the interchange column set; missing scores are
/// `null`, never omitted, so the table keeps a fixed column shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRankingRow {
    #[serde(rename = "Model")]
    pub model: String,
    /// Force-field prediction error, lower is better
    #[serde(rename = "Generalizability-FF-Error")]
    pub ff_error: Option<f64>,
    /// Property-calculation error, lower is better
    #[serde(rename = "Generalizability-PC-Error")]
    pub pc_error: Option<f64>,
    /// MD instability, lower is better
    #[serde(rename = "Applicability-Instability")]
    pub instability: Option<f64>,
    /// Inference efficiency relative to the reference rate, higher is better
    #[serde(rename = "Applicability-Efficiency")]
    pub efficiency: Option<f64>,
}

/// A ranking row with its 1-based position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(flatten)]
    pub row: FinalRankingRow,
}

/// Ascending comparison with missing values last
fn cmp_asc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending comparison with missing values still last
fn cmp_desc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_rows(a: &FinalRankingRow, b: &FinalRankingRow) -> Ordering {
    cmp_asc_missing_last(a.ff_error, b.ff_error)
        .then_with(|| cmp_asc_missing_last(a.pc_error, b.pc_error))
        .then_with(|| cmp_asc_missing_last(a.instability, b.instability))
        .then_with(|| cmp_desc_missing_last(a.efficiency, b.efficiency))
}

/// Sort the full row set and assign 1-based ranks.
pub fn rank(mut rows: Vec<FinalRankingRow>) -> Vec<RankedRow> {
    rows.sort_by(compare_rows);
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| RankedRow { rank: i + 1, row })
        .collect()
}
