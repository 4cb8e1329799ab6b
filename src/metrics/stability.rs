//! MD stability aggregation
//!
//! Reduces per-structure NVE drift measurements into one instability score.
//! A failed simulation contributes a fixed penalty instead of dropping out:
//! a model that crashes must rank worse than one that merely drifts, so
//! total failure still yields a comparable (worst-case) score. This is
//! deliberately different from the "missing data ⇒ None" rule used for the
//! generalizability composites.

use crate::records::StabilityMeasurement;
use std::collections::BTreeMap;
use tracing::warn;

/// Instability assigned to a failed or non-finite run
pub const FAILURE_PENALTY: f64 = 5.0;

/// Instability contribution of one structure: `max(0, log10(Φ/Φ_tol))`,
/// or [`FAILURE_PENALTY`] when the run failed.
pub fn instability(measurement: &StabilityMeasurement, tolerance: f64) -> f64 {
    if measurement.is_failed() {
        return FAILURE_PENALTY;
    }
    // is_failed guarantees a finite drift here
    let drift = measurement.drift.unwrap_or(f64::NAN);
    (drift / tolerance).log10().max(0.0)
}

/// Mean instability over the evaluated structure set.
///
/// The expected set comes from configuration; a coverage mismatch is logged
/// but does not invalidate the aggregate. An empty record set is missing
/// data and yields `None` — only *failed* runs map to the penalty.
pub fn aggregate_stability(
    structures: &BTreeMap<String, StabilityMeasurement>,
    expected: &[String],
    tolerance: f64,
) -> Option<f64> {
    if structures.is_empty() {
        warn!("no stability measurements supplied");
        return None;
    }
    if !expected.is_empty() && structures.len() != expected.len() {
        let missing: Vec<&String> = expected
            .iter()
            .filter(|name| !structures.contains_key(*name))
            .collect();
        warn!(
            measured = structures.len(),
            expected = expected.len(),
            ?missing,
            "stability structure coverage mismatch"
        );
    }

    let total: f64 = structures
        .values()
        .map(|m| instability(m, tolerance))
        .sum();
    Some(total / structures.len() as f64)
}
