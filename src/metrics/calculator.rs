//! Composite score assembly
//!
//! Reduces each model's processed results to the four leaderboard columns:
//! generalizability FF-Error and PC-Error (per-domain composites, FF scores
//! optionally normalized against a baseline model), applicability
//! instability and efficiency (straight from the calculator track).

use crate::config::{BenchmarkConfig, Domain};
use crate::fetcher::ModelResults;
use crate::metrics::domain::{exp_average, linear_average};
use crate::metrics::ranking::{rank, FinalRankingRow, RankedRow};
use std::collections::BTreeMap;
use tracing::warn;

/// Per-domain score map for one model
pub type DomainScores = BTreeMap<Domain, Option<f64>>;

/// Computes composite scores and the final ranking table
pub struct MetricsCalculator<'a> {
    config: &'a BenchmarkConfig,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(config: &'a BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Exp-averaged force-field score per domain.
    pub fn domain_force_field_scores(&self, results: &ModelResults) -> DomainScores {
        let mut scores = BTreeMap::new();
        for (domain, tasks) in self.config.domain_to_force_field_tasks() {
            let score = results.direct.as_ref().and_then(|direct| {
                let task_scores: Vec<Option<f64>> = tasks
                    .iter()
                    .map(|task| direct.normalized.get(task).copied().flatten())
                    .collect();
                exp_average(&task_scores, None)
            });
            scores.insert(domain, score);
        }
        scores
    }

    /// Linear-averaged property score per domain.
    pub fn domain_property_scores(&self, results: &ModelResults) -> DomainScores {
        let mut scores = BTreeMap::new();
        for (domain, tasks) in self.config.domain_to_property_tasks() {
            let score = results.property.as_ref().and_then(|property| {
                let task_scores: Vec<Option<f64>> = tasks
                    .iter()
                    .map(|task| self.property_task_score(&results.spec.model_name, task, property))
                    .collect();
                linear_average(&task_scores, None)
            });
            scores.insert(domain, score);
        }
        scores
    }

    /// Linear std-normalized composite for one property task:
    /// `Σ wᵢ·(valueᵢ/stdᵢ) / Σ wᵢ` over the configured metrics.
    fn property_task_score(
        &self,
        model: &str,
        task: &str,
        property: &crate::fetcher::PropertyTaskResults,
    ) -> Option<f64> {
        let task_config = &self.config.property_tasks[task];
        let Some(means) = property.per_task.get(task) else {
            warn!(model, task, "no property results for configured task");
            return None;
        };
        if task_config.metrics.is_empty() {
            warn!(task, "property task has no scoring metrics configured");
            return None;
        }

        let mut total = 0.0;
        let mut weight_total = 0.0;
        for (name, norm) in &task_config.metrics {
            let Some(value) = means.get(name) else {
                warn!(model, task, metric = %name, "required property metric missing");
                return None;
            };
            total += norm.weight * value / norm.std;
            weight_total += norm.weight;
        }
        (weight_total > 0.0).then(|| total / weight_total)
    }

    /// Mean over domains, each domain optionally normalized against the
    /// baseline model's score: `min(s/b, 1)`.
    fn composite_error(scores: &DomainScores, baseline: Option<&DomainScores>) -> Option<f64> {
        let mut values = Vec::new();
        for (domain, score) in scores {
            let Some(s) = score else { continue };
            let normalized = match baseline
                .and_then(|b| b.get(domain))
                .copied()
                .flatten()
                .filter(|b| *b > 0.0)
            {
                Some(b) => (s / b).min(1.0),
                None => *s,
            };
            values.push(normalized);
        }
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Build the leaderboard row for one model.
    pub fn final_row(
        &self,
        results: &ModelResults,
        ff_baseline: Option<&DomainScores>,
    ) -> FinalRankingRow {
        let ff_scores = self.domain_force_field_scores(results);
        let pc_scores = self.domain_property_scores(results);
        FinalRankingRow {
            model: results.spec.model_name.clone(),
            ff_error: Self::composite_error(&ff_scores, ff_baseline),
            pc_error: Self::composite_error(&pc_scores, None),
            instability: results.calculator.as_ref().and_then(|c| c.instability),
            efficiency: results
                .calculator
                .as_ref()
                .and_then(|c| c.efficiency_score),
        }
    }

    /// Full ranked leaderboard: one row per leaderboard-gated model,
    /// sorted and numbered.
    pub fn summarize_final_rankings(
        &self,
        results: &BTreeMap<String, ModelResults>,
    ) -> Vec<RankedRow> {
        let ff_baseline = self
            .config
            .baseline_model
            .as_deref()
            .and_then(|name| results.get(name))
            .map(|r| self.domain_force_field_scores(r));
        if self.config.baseline_model.is_some() && ff_baseline.is_none() {
            warn!(
                baseline = ?self.config.baseline_model,
                "configured baseline model has no results; scores stay unnormalized"
            );
        }

        let rows: Vec<FinalRankingRow> = results
            .values()
            .filter(|r| r.spec.on_leaderboard())
            .map(|r| self.final_row(r, ff_baseline.as_ref()))
            .collect();
        rank(rows)
    }

    /// Domain name → model name → force-field domain score, for the
    /// barplot output.
    pub fn barplot_data(
        &self,
        results: &BTreeMap<String, ModelResults>,
    ) -> BTreeMap<String, BTreeMap<String, Option<f64>>> {
        let mut data: BTreeMap<String, BTreeMap<String, Option<f64>>> = BTreeMap::new();
        for model_results in results.values().filter(|r| r.spec.on_leaderboard()) {
            for (domain, score) in self.domain_force_field_scores(model_results) {
                data.entry(domain.name().to_string())
                    .or_default()
                    .insert(model_results.spec.model_name.clone(), score);
            }
        }
        data
    }
}
