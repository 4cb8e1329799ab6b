//! Benchmark configuration
//!
//! One explicit [`BenchmarkConfig`] object is loaded from YAML at process
//! start and passed by reference into every aggregator. There is no global
//! configuration state; tests construct synthetic configs directly.
//!
//! Configuration defects are fatal — they are setup problems, not
//! data-quality problems.

mod schema;

pub use schema::{
    BenchmarkConfig, Domain, ForceFieldTaskConfig, MetricNorm, PropertyTaskConfig, TaskWeights,
};

#[cfg(test)]
pub(crate) use schema::test_support;

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

impl BenchmarkConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BenchmarkConfig =
            serde_yaml::from_str(&contents).map_err(|source| Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: BenchmarkConfig = serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants that the schema alone cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.force_field_tasks.is_empty() {
            return Err(Error::Config("no force-field tasks configured".to_string()));
        }
        if self.efficiency_reference <= 0.0 {
            return Err(Error::Config(format!(
                "efficiency_reference must be positive, got {}",
                self.efficiency_reference
            )));
        }
        if self.instability_tolerance <= 0.0 {
            return Err(Error::Config(format!(
                "instability_tolerance must be positive, got {}",
                self.instability_tolerance
            )));
        }
        for (task, cfg) in &self.force_field_tasks {
            if cfg.weights.energy_weight.is_none()
                && cfg.weights.force_weight.is_none()
                && cfg.weights.virial_weight.is_none()
            {
                return Err(Error::Config(format!(
                    "force-field task '{task}' excludes every metric"
                )));
            }
        }
        // A subtask must map back to exactly one parent property task.
        let mut seen = std::collections::BTreeSet::new();
        for (task, cfg) in &self.property_tasks {
            if cfg.subtasks.is_empty() {
                return Err(Error::Config(format!(
                    "property task '{task}' has no subtasks"
                )));
            }
            for subtask in &cfg.subtasks {
                if !seen.insert(subtask.clone()) {
                    return Err(Error::Config(format!(
                        "property subtask '{subtask}' is mapped to more than one task"
                    )));
                }
            }
        }
        Ok(())
    }
}
