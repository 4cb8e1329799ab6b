//! Raw result records
//!
//! The data model for everything the aggregation engine consumes: per-task
//! force-field errors, property subtask metrics, and calculator measurements
//! (MD stability, inference efficiency). Records are produced by external
//! task runners and are immutable once loaded; how they were computed is not
//! this crate's concern.
//!
//! Missing values are `Option<f64>` end to end and serialize as JSON `null`,
//! never a string or NaN sentinel.

mod source;

pub use source::{JsonRecordSource, RecordSource};

use crate::models::ModelSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The three force-field error metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorMetric {
    Energy,
    Force,
    Virial,
}

impl ErrorMetric {
    pub const ALL: [ErrorMetric; 3] = [ErrorMetric::Energy, ErrorMetric::Force, ErrorMetric::Virial];

    /// Metric key as it appears in record files
    pub fn key(&self) -> &'static str {
        match self {
            ErrorMetric::Energy => "energy_rmse",
            ErrorMetric::Force => "force_rmse",
            ErrorMetric::Virial => "virial_rmse",
        }
    }
}

/// Raw error metrics from one evaluation of one task on one model
///
/// A `None` field means the underlying quantity was not computed, e.g. no
/// virial labels in the test set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub energy_rmse: Option<f64>,
    #[serde(default)]
    pub force_rmse: Option<f64>,
    #[serde(default)]
    pub virial_rmse: Option<f64>,
}

impl TaskResult {
    pub fn get(&self, metric: ErrorMetric) -> Option<f64> {
        match metric {
            ErrorMetric::Energy => self.energy_rmse,
            ErrorMetric::Force => self.force_rmse,
            ErrorMetric::Virial => self.virial_rmse,
        }
    }

    fn clear(&mut self, metric: ErrorMetric) {
        match metric {
            ErrorMetric::Energy => self.energy_rmse = None,
            ErrorMetric::Force => self.force_rmse = None,
            ErrorMetric::Virial => self.virial_rmse = None,
        }
    }

    /// Blank out weight-excluded metrics so downstream consumers never see
    /// them as present. Callers apply this with the excluded set returned by
    /// the result filter.
    pub fn mask_excluded(&mut self, excluded: &BTreeSet<ErrorMetric>) {
        for &metric in excluded {
            self.clear(metric);
        }
    }
}

/// One force-field prediction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceFieldRecord {
    pub model_name: String,
    pub task_name: String,
    /// When the evaluation ran; used for as-of filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub result: TaskResult,
}

/// One property subtask record (finetune track)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub model_name: String,
    /// Subtask name; mapped back to its parent task via configuration
    pub task_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_time: Option<DateTime<Utc>>,
    /// Metric name → value for this subtask
    pub metrics: BTreeMap<String, f64>,
}

/// Per-structure NVE MD stability measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMeasurement {
    /// Total-energy drift magnitude Φ in eV/atom/ps
    #[serde(default)]
    pub drift: Option<f64>,
    /// Whether the simulation crashed before producing a drift estimate
    #[serde(default)]
    pub failed: bool,
}

impl StabilityMeasurement {
    /// A run counts as failed when flagged, unmeasured, or non-finite.
    pub fn is_failed(&self) -> bool {
        self.failed || !self.drift.is_some_and(f64::is_finite)
    }
}

/// Per-system inference timing measurement (warmup steps excluded)
///
/// `average_time = None` signals the system could not be measured at all,
/// which is distinct from "measured but slow".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMeasurement {
    /// Mean inference time in µs/atom
    pub average_time: Option<f64>,
    /// Standard deviation of per-step times in µs/atom
    pub std_time: Option<f64>,
    /// Fraction of successful inference steps, 0–100 scale
    #[serde(default)]
    pub success_rate: f64,
}

/// Payload of one calculator-track record, discriminated by task name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "task_name", rename_all = "snake_case")]
pub enum CalculatorTask {
    /// Constant-energy MD stability, one measurement per structure
    NveMd {
        structures: BTreeMap<String, StabilityMeasurement>,
    },
    /// Inference efficiency, one measurement per benchmark system
    InferenceEfficiency {
        systems: BTreeMap<String, EfficiencyMeasurement>,
    },
}

/// One calculator-track record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorRecord {
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub task: CalculatorTask,
}

/// A complete materialized set of raw records for one aggregation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub force_field: Vec<ForceFieldRecord>,
    #[serde(default)]
    pub property: Vec<PropertyRecord>,
    #[serde(default)]
    pub calculator: Vec<CalculatorRecord>,
}
