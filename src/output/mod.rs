//! Output serialization
//!
//! Writes the two interchange files consumed by the reporting layer —
//! `final_rankings.json` and `barplot.json` — plus the per-model results
//! bundle, and renders a text ranking table for terminal use. Missing
//! values serialize as JSON `null` and survive round-trips exactly.

use crate::error::{Error, Result};
use crate::fetcher::ModelResults;
use crate::metrics::RankedRow;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Everything one aggregation run produces
#[derive(Debug, Clone, Serialize)]
pub struct AggregationOutput {
    /// Ordered leaderboard rows
    pub final_rankings: Vec<RankedRow>,
    /// Domain name → model name → domain score
    pub barplot: BTreeMap<String, BTreeMap<String, Option<f64>>>,
    /// Per-model processed result bundles
    pub results: BTreeMap<String, ModelResults>,
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = dir.join(name);
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(&path, json).map_err(|source| Error::OutputIo { path, source })
}

impl AggregationOutput {
    /// Write `final_rankings.json`, `barplot.json`, and `results.json`
    /// into `dir`, creating it if needed.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| Error::OutputIo {
            path: dir.to_path_buf(),
            source,
        })?;
        write_json(dir, "final_rankings.json", &self.final_rankings)?;
        write_json(dir, "barplot.json", &self.barplot)?;
        write_json(dir, "results.json", &self.results)?;
        Ok(())
    }
}

/// Text rendering of the final rankings
pub struct RankingTable<'a>(pub &'a [RankedRow]);

const SCORE_COLUMNS: [&str; 4] = [
    "FF-Error ↓",
    "PC-Error ↓",
    "Instability ↓",
    "Efficiency ↑",
];

fn fmt_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format!("{value:.3}"),
        None => "—".to_string(),
    }
}

fn border(model_width: usize, left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    line.push_str(&"─".repeat(6));
    line.push(mid);
    line.push_str(&"─".repeat(model_width + 2));
    for _ in SCORE_COLUMNS {
        line.push(mid);
        line.push_str(&"─".repeat(15));
    }
    line.push(right);
    line
}

impl fmt::Display for RankingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Rankings: (empty)");
        }

        let model_width = self
            .0
            .iter()
            .map(|r| r.row.model.len())
            .max()
            .unwrap_or(5)
            .max(5);

        writeln!(f, "{}", border(model_width, '┌', '┬', '┐'))?;
        write!(f, "│ Rank │ {:model_width$} │", "Model")?;
        for column in SCORE_COLUMNS {
            write!(f, " {column:>13} │")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", border(model_width, '├', '┼', '┤'))?;

        for ranked in self.0 {
            let row = &ranked.row;
            write!(f, "│ {:>4} │ {:model_width$} │", ranked.rank, row.model)?;
            for score in [row.ff_error, row.pc_error, row.instability, row.efficiency] {
                write!(f, " {:>13} │", fmt_score(score))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{}", border(model_width, '└', '┴', '┘'))
    }
}
