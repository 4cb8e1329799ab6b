//! Record sources
//!
//! The aggregation engine only sees the [`RecordSource`] trait; where the
//! records actually live (a JSON export here, a database elsewhere) is a
//! collaborator concern.

use super::{CalculatorRecord, ForceFieldRecord, PropertyRecord, RecordSet};
use crate::error::{Error, Result};
use crate::models::ModelSpec;
use std::fs;
use std::path::Path;

/// Supplies raw records per model
pub trait RecordSource {
    /// All models known to this source, leaderboard-gated or not
    fn models(&self) -> &[ModelSpec];

    /// Force-field prediction records for one model
    fn force_field_records(&self, model_name: &str) -> Vec<&ForceFieldRecord>;

    /// Property subtask records for one model
    fn property_records(&self, model_name: &str) -> Vec<&PropertyRecord>;

    /// Calculator-track records for one model
    fn calculator_records(&self, model_name: &str) -> Vec<&CalculatorRecord>;
}

/// Record source backed by a single JSON export file
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    records: RecordSet,
}

impl JsonRecordSource {
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }

    /// Load a record set from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::RecordIo {
            path: path.to_path_buf(),
            source,
        })?;
        let records: RecordSet =
            serde_json::from_str(&contents).map_err(|source| Error::RecordParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(records))
    }

    pub fn record_set(&self) -> &RecordSet {
        &self.records
    }
}

impl RecordSource for JsonRecordSource {
    fn models(&self) -> &[ModelSpec] {
        &self.records.models
    }

    fn force_field_records(&self, model_name: &str) -> Vec<&ForceFieldRecord> {
        self.records
            .force_field
            .iter()
            .filter(|r| r.model_name == model_name)
            .collect()
    }

    fn property_records(&self, model_name: &str) -> Vec<&PropertyRecord> {
        self.records
            .property
            .iter()
            .filter(|r| r.model_name == model_name)
            .collect()
    }

    fn calculator_records(&self, model_name: &str) -> Vec<&CalculatorRecord> {
        self.records
            .calculator
            .iter()
            .filter(|r| r.model_name == model_name)
            .collect()
    }
}
