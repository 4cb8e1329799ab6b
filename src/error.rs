//! Crate-level error types
//!
//! Only configuration defects are fatal. Data-quality problems (missing
//! metrics, incomplete task sets, failed simulations) are handled inside the
//! aggregators as `None` scores or penalty values and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an aggregation run
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown task '{task}' in record for model '{model}': no domain mapping configured")]
    UnknownTask { task: String, model: String },

    #[error("unknown property subtask '{subtask}' in record for model '{model}'")]
    UnknownSubtask { subtask: String, model: String },

    #[error("failed to read record set {path}: {source}")]
    RecordIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse record set {path}: {source}")]
    RecordParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write output {path}: {source}")]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for aggregation operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("no tasks defined".to_string());
        assert!(format!("{err}").contains("configuration error"));

        let err = Error::UnknownTask {
            task: "qm9".to_string(),
            model: "mace-mp-0".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("qm9"));
        assert!(msg.contains("mace-mp-0"));
        assert!(msg.contains("no domain mapping"));
    }
}
