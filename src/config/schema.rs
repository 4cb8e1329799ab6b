//! Serde schema for the benchmark configuration file

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scientific domain partitioning the task namespace
///
/// Every task belongs to exactly one domain. The set is closed: adding a
/// domain is a code change, not a configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Small molecules and molecular dynamics datasets
    Molecules,
    /// Bulk inorganic materials
    InorganicMaterials,
    /// Surfaces and catalytic systems
    Catalysis,
}

impl Domain {
    /// Stable display name used in output files
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Molecules => "Molecules",
            Domain::InorganicMaterials => "Inorganic Materials",
            Domain::Catalysis => "Catalysis",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-task normalization weights and baseline scales
///
/// A `None` weight excludes that metric from the composite score entirely.
/// The `*_std` fields supply the reference scale for linear normalization
/// and default to 1.0 when the configuration omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWeights {
    #[serde(default)]
    pub energy_weight: Option<f64>,
    #[serde(default)]
    pub force_weight: Option<f64>,
    #[serde(default)]
    pub virial_weight: Option<f64>,
    #[serde(default = "default_std")]
    pub energy_std: f64,
    #[serde(default = "default_std")]
    pub force_std: f64,
    #[serde(default = "default_std")]
    pub virial_std: f64,
}

impl Default for TaskWeights {
    fn default() -> Self {
        Self {
            energy_weight: Some(1.0),
            force_weight: Some(1.0),
            virial_weight: None,
            energy_std: 1.0,
            force_std: 1.0,
            virial_std: 1.0,
        }
    }
}

fn default_std() -> f64 {
    1.0
}

/// Configuration for one force-field prediction task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceFieldTaskConfig {
    /// Domain this task belongs to
    pub domain: Domain,
    /// Normalization weights and scales
    #[serde(flatten)]
    pub weights: TaskWeights,
}

/// Normalization for one property metric (linear mode: `weight * value / std`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricNorm {
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_std")]
    pub std: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for MetricNorm {
    fn default() -> Self {
        Self { weight: 1.0, std: 1.0 }
    }
}

/// Configuration for one property-calculation task
///
/// A property task is evaluated through several subtasks (folds or
/// individual systems); raw records arrive per subtask and are grouped back
/// under the parent task before scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTaskConfig {
    /// Domain this task belongs to
    pub domain: Domain,
    /// Subtask names whose records roll up into this task
    pub subtasks: Vec<String>,
    /// Metric name → normalization used for the property-error composite
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricNorm>,
}

/// Complete benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Force-field prediction tasks, keyed by task name
    pub force_field_tasks: BTreeMap<String, ForceFieldTaskConfig>,

    /// Property-calculation tasks, keyed by parent task name
    #[serde(default)]
    pub property_tasks: BTreeMap<String, PropertyTaskConfig>,

    /// Structures evaluated in the NVE MD stability task
    #[serde(default)]
    pub md_structures: Vec<String>,

    /// Reference inference throughput η₀ in µs/atom
    #[serde(default = "default_efficiency_reference")]
    pub efficiency_reference: f64,

    /// Energy-drift tolerance Φ_tol in eV/atom/ps
    #[serde(default = "default_instability_tolerance")]
    pub instability_tolerance: f64,

    /// Baseline model used for dummy normalization of domain scores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_model: Option<String>,
}

fn default_efficiency_reference() -> f64 {
    100.0
}

fn default_instability_tolerance() -> f64 {
    5e-4
}

impl BenchmarkConfig {
    /// Map each domain to the force-field tasks it contains.
    pub fn domain_to_force_field_tasks(&self) -> BTreeMap<Domain, Vec<String>> {
        let mut mapping: BTreeMap<Domain, Vec<String>> = BTreeMap::new();
        for (task, cfg) in &self.force_field_tasks {
            mapping.entry(cfg.domain).or_default().push(task.clone());
        }
        mapping
    }

    /// Map each domain to the property tasks it contains.
    pub fn domain_to_property_tasks(&self) -> BTreeMap<Domain, Vec<String>> {
        let mut mapping: BTreeMap<Domain, Vec<String>> = BTreeMap::new();
        for (task, cfg) in &self.property_tasks {
            mapping.entry(cfg.domain).or_default().push(task.clone());
        }
        mapping
    }

    /// Reverse map from property subtask name to its parent task.
    pub fn subtask_to_property_task(&self) -> BTreeMap<String, String> {
        let mut mapping = BTreeMap::new();
        for (task, cfg) in &self.property_tasks {
            for subtask in &cfg.subtasks {
                mapping.insert(subtask.clone(), task.clone());
            }
        }
        mapping
    }
}

#[cfg(test)]
pub mod test_support {
    //! Synthetic configurations for unit tests

    use super::*;

    /// Two force-field tasks (one per domain), one property task, two MD
    /// structures. Small but exercises every config surface.
    pub fn minimal_config() -> BenchmarkConfig {
        let mut force_field_tasks = BTreeMap::new();
        force_field_tasks.insert(
            "ani1x".to_string(),
            ForceFieldTaskConfig {
                domain: Domain::Molecules,
                weights: TaskWeights {
                    energy_weight: Some(1.0),
                    force_weight: Some(0.5),
                    virial_weight: None,
                    ..TaskWeights::default()
                },
            },
        );
        force_field_tasks.insert(
            "mptrj".to_string(),
            ForceFieldTaskConfig {
                domain: Domain::InorganicMaterials,
                weights: TaskWeights {
                    energy_weight: Some(1.0),
                    force_weight: Some(1.0),
                    virial_weight: Some(0.5),
                    ..TaskWeights::default()
                },
            },
        );

        let mut metrics = BTreeMap::new();
        metrics.insert("mae".to_string(), MetricNorm { weight: 1.0, std: 0.1 });
        let mut property_tasks = BTreeMap::new();
        property_tasks.insert(
            "elastic".to_string(),
            PropertyTaskConfig {
                domain: Domain::InorganicMaterials,
                subtasks: vec!["elastic_fold0".to_string(), "elastic_fold1".to_string()],
                metrics,
            },
        );

        BenchmarkConfig {
            force_field_tasks,
            property_tasks,
            md_structures: vec!["water_64".to_string(), "si_216".to_string()],
            efficiency_reference: 100.0,
            instability_tolerance: 5e-4,
            baseline_model: None,
        }
    }
}
