//! Result fetching and per-model processing
//!
//! Pulls raw records for each model from a [`RecordSource`], applies the
//! per-task filters and the calculator-track aggregators, and produces one
//! [`ModelResults`] bundle per model. Missing data is isolated per model —
//! it degrades that model's scores to `None` with a warning and never aborts
//! the run. Unknown task names are configuration defects and do abort.

use crate::config::BenchmarkConfig;
use crate::error::{Error, Result};
use crate::metrics::domain::exp_average;
use crate::metrics::efficiency::{aggregate_efficiency, efficiency_score, EfficiencyAggregate};
use crate::metrics::filter::{filter_force_field_result, NormalizationMode};
use crate::metrics::stability::aggregate_stability;
use crate::models::ModelSpec;
use crate::records::{
    CalculatorTask, EfficiencyMeasurement, RecordSource, StabilityMeasurement, TaskResult,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Processed force-field (direct) task results for one model
#[derive(Debug, Clone, Serialize)]
pub struct DirectTaskResults {
    /// Raw results per task, with weight-excluded metrics masked out
    pub per_task: BTreeMap<String, TaskResult>,
    /// Log-domain composite score per task; `None` on missing metrics
    pub normalized: BTreeMap<String, Option<f64>>,
    /// Exp-averaged total across the full task set; `None` when coverage
    /// is incomplete
    pub weighted: Option<f64>,
}

/// Processed property (finetune) task results for one model
#[derive(Debug, Clone, Serialize)]
pub struct PropertyTaskResults {
    /// Parent task → metric name → mean over subtasks (7 decimals)
    pub per_task: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Processed calculator-track results for one model
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorResults {
    /// Mean NVE instability over the evaluated structures
    pub instability: Option<f64>,
    /// Pooled inference timing statistics
    pub efficiency: EfficiencyAggregate,
    /// `η₀ / η̄`, higher is better
    pub efficiency_score: Option<f64>,
}

/// Everything the ranking engine needs to know about one model
#[derive(Debug, Clone, Serialize)]
pub struct ModelResults {
    pub spec: ModelSpec,
    /// Present iff the direct task category is enabled and records exist
    pub direct: Option<DirectTaskResults>,
    pub property: Option<PropertyTaskResults>,
    pub calculator: Option<CalculatorResults>,
}

/// Collects and processes raw records per model
pub struct ResultsFetcher<'a, S: RecordSource> {
    source: &'a S,
    config: &'a BenchmarkConfig,
    as_of: Option<DateTime<Utc>>,
}

impl<'a, S: RecordSource> ResultsFetcher<'a, S> {
    pub fn new(source: &'a S, config: &'a BenchmarkConfig) -> Self {
        Self {
            source,
            config,
            as_of: None,
        }
    }

    /// Restrict aggregation to records taken at or before `as_of`.
    /// Records without a timestamp are always included.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    fn in_window(&self, record_time: Option<DateTime<Utc>>) -> bool {
        match (self.as_of, record_time) {
            (Some(as_of), Some(t)) => t <= as_of,
            _ => true,
        }
    }

    /// Process every model known to the source.
    ///
    /// Only configuration defects (unknown task or subtask names) abort;
    /// a model with missing data comes back with `None` scores.
    pub fn fetch_all(&self) -> Result<BTreeMap<String, ModelResults>> {
        let mut results = BTreeMap::new();
        for spec in self.source.models() {
            let model = self.fetch_one(spec)?;
            results.insert(spec.model_name.clone(), model);
        }
        Ok(results)
    }

    /// Fetch and process raw records for one model across its enabled
    /// task categories.
    pub fn fetch_one(&self, spec: &ModelSpec) -> Result<ModelResults> {
        let direct = if spec.show_direct_task {
            self.process_direct(spec)?
        } else {
            None
        };
        let property = if spec.show_finetune_task {
            self.process_property(spec)?
        } else {
            None
        };
        let calculator = if spec.show_calculator_task {
            self.process_calculator(spec)
        } else {
            None
        };
        Ok(ModelResults {
            spec: spec.clone(),
            direct,
            property,
            calculator,
        })
    }

    fn process_direct(&self, spec: &ModelSpec) -> Result<Option<DirectTaskResults>> {
        let records: Vec<_> = self
            .source
            .force_field_records(&spec.model_name)
            .into_iter()
            .filter(|r| self.in_window(r.record_time))
            .collect();
        if records.is_empty() {
            warn!(model = %spec.model_name, "no direct task records found");
            return Ok(None);
        }

        let mut per_task = BTreeMap::new();
        let mut normalized = BTreeMap::new();
        for record in records {
            let task_config = self
                .config
                .force_field_tasks
                .get(&record.task_name)
                .ok_or_else(|| Error::UnknownTask {
                    task: record.task_name.clone(),
                    model: spec.model_name.clone(),
                })?;

            let filtered = filter_force_field_result(
                &record.result,
                &task_config.weights,
                NormalizationMode::LogWeighted,
            );
            let composite = filtered.composite();
            if composite.is_none() {
                warn!(
                    model = %spec.model_name,
                    task = %record.task_name,
                    missing = ?filtered.missing_required(),
                    "required metrics missing, task contribution dropped to None"
                );
            }

            let mut masked = record.result.clone();
            masked.mask_excluded(&filtered.excluded);
            per_task.insert(record.task_name.clone(), masked);
            normalized.insert(record.task_name.clone(), composite);
        }

        // Partial task coverage must not produce a misleadingly complete
        // total.
        let weighted = if per_task.len() == self.config.force_field_tasks.len() {
            let scores: Vec<Option<f64>> = normalized.values().copied().collect();
            exp_average(&scores, None)
        } else {
            let missing: Vec<&String> = self
                .config
                .force_field_tasks
                .keys()
                .filter(|task| !per_task.contains_key(*task))
                .collect();
            warn!(
                model = %spec.model_name,
                ?missing,
                "weighted total set to None due to missing tasks"
            );
            None
        };

        Ok(Some(DirectTaskResults {
            per_task,
            normalized,
            weighted,
        }))
    }

    fn process_property(&self, spec: &ModelSpec) -> Result<Option<PropertyTaskResults>> {
        let records: Vec<_> = self
            .source
            .property_records(&spec.model_name)
            .into_iter()
            .filter(|r| self.in_window(r.record_time))
            .collect();
        if records.is_empty() {
            warn!(model = %spec.model_name, "no property task records found");
            return Ok(None);
        }

        let reverse_map = self.config.subtask_to_property_task();
        let mut grouped: BTreeMap<String, Vec<&BTreeMap<String, f64>>> = BTreeMap::new();
        for record in records {
            let parent =
                reverse_map
                    .get(&record.task_name)
                    .ok_or_else(|| Error::UnknownSubtask {
                        subtask: record.task_name.clone(),
                        model: spec.model_name.clone(),
                    })?;
            grouped.entry(parent.clone()).or_default().push(&record.metrics);
        }

        let mut per_task = BTreeMap::new();
        for (task, folds) in grouped {
            let expected = self.config.property_tasks[&task].subtasks.len();
            if folds.len() != expected {
                warn!(
                    model = %spec.model_name,
                    task = %task,
                    got = folds.len(),
                    expected,
                    "missing property subtask data"
                );
            }

            // Mean per metric over the folds that report it, rounded to 7
            // decimals to keep output files stable across runs.
            let mut metric_names: Vec<&String> = folds.iter().flat_map(|m| m.keys()).collect();
            metric_names.sort();
            metric_names.dedup();

            let mut means = BTreeMap::new();
            for name in metric_names {
                let values: Vec<f64> = folds.iter().filter_map(|m| m.get(name)).copied().collect();
                if values.is_empty() {
                    continue;
                }
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                means.insert(name.clone(), round7(mean));
            }
            per_task.insert(task, means);
        }

        Ok(Some(PropertyTaskResults { per_task }))
    }

    fn process_calculator(&self, spec: &ModelSpec) -> Option<CalculatorResults> {
        let records: Vec<_> = self
            .source
            .calculator_records(&spec.model_name)
            .into_iter()
            .filter(|r| self.in_window(r.record_time))
            .collect();
        if records.is_empty() {
            warn!(model = %spec.model_name, "no calculator task records found");
            return None;
        }

        let mut stability: BTreeMap<String, StabilityMeasurement> = BTreeMap::new();
        let mut timing: BTreeMap<String, EfficiencyMeasurement> = BTreeMap::new();
        for record in records {
            match &record.task {
                CalculatorTask::NveMd { structures } => {
                    stability.extend(structures.clone());
                }
                CalculatorTask::InferenceEfficiency { systems } => {
                    timing.extend(systems.clone());
                }
            }
        }

        let instability = aggregate_stability(
            &stability,
            &self.config.md_structures,
            self.config.instability_tolerance,
        );
        let efficiency = aggregate_efficiency(&timing);
        let score = efficiency_score(&efficiency, self.config.efficiency_reference);

        Some(CalculatorResults {
            instability,
            efficiency,
            efficiency_score: score,
        })
    }
}

fn round7(value: f64) -> f64 {
    (value * 1e7).round() / 1e7
}
