//! Force-field result normalization
//!
//! Turns one task's raw error metrics into per-metric normalized scores
//! against the configured weights. Two mutually exclusive modes: log-domain
//! weighting for the force-field error composite, and linear std
//! normalization for baseline-scaled comparisons.
//!
//! Exclusion is explicit: instead of mutating caller-owned data, the filter
//! reports the excluded metric set alongside the scores and callers apply
//! [`TaskResult::mask_excluded`](crate::records::TaskResult::mask_excluded)
//! on their owned copy.

use crate::config::TaskWeights;
use crate::records::{ErrorMetric, TaskResult};
use std::collections::{BTreeMap, BTreeSet};

/// How raw metric values are normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMode {
    /// `weight * ln(value)` — log-domain, for geometric-mean style composites
    LogWeighted,
    /// `weight * value / std` — linear, against the configured baseline scale
    LinearStd,
}

/// Per-metric normalized scores plus the set of weight-excluded metrics
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredResult {
    /// One entry per metric; `None` for excluded or missing metrics
    pub scores: BTreeMap<ErrorMetric, Option<f64>>,
    /// Metrics excluded by a `None` weight in the configuration
    pub excluded: BTreeSet<ErrorMetric>,
}

impl FilteredResult {
    /// Composite task score: sum of non-excluded per-metric scores.
    ///
    /// `None` if any required (non-excluded) metric was missing from the raw
    /// result — missingness propagates, it is never silently zeroed.
    pub fn composite(&self) -> Option<f64> {
        let mut total = 0.0;
        for (metric, score) in &self.scores {
            if self.excluded.contains(metric) {
                continue;
            }
            total += (*score)?;
        }
        Some(total)
    }

    /// Metrics that carry a weight but had no raw value
    pub fn missing_required(&self) -> Vec<ErrorMetric> {
        self.scores
            .iter()
            .filter(|(m, s)| s.is_none() && !self.excluded.contains(*m))
            .map(|(m, _)| *m)
            .collect()
    }
}

fn weight_for(weights: &TaskWeights, metric: ErrorMetric) -> Option<f64> {
    match metric {
        ErrorMetric::Energy => weights.energy_weight,
        ErrorMetric::Force => weights.force_weight,
        ErrorMetric::Virial => weights.virial_weight,
    }
}

fn std_for(weights: &TaskWeights, metric: ErrorMetric) -> f64 {
    match metric {
        ErrorMetric::Energy => weights.energy_std,
        ErrorMetric::Force => weights.force_std,
        ErrorMetric::Virial => weights.virial_std,
    }
}

/// Normalize one task result against its configured weights.
///
/// Never fails: a missing optional (excluded) metric is not an error, and a
/// missing required metric shows up as `None` in the scores and in
/// [`FilteredResult::missing_required`].
pub fn filter_force_field_result(
    result: &TaskResult,
    weights: &TaskWeights,
    mode: NormalizationMode,
) -> FilteredResult {
    let mut scores = BTreeMap::new();
    let mut excluded = BTreeSet::new();

    for metric in ErrorMetric::ALL {
        let Some(weight) = weight_for(weights, metric) else {
            excluded.insert(metric);
            scores.insert(metric, None);
            continue;
        };
        let score = result.get(metric).map(|value| match mode {
            NormalizationMode::LogWeighted => weight * value.ln(),
            NormalizationMode::LinearStd => weight * value / std_for(weights, metric),
        });
        scores.insert(metric, score);
    }

    FilteredResult { scores, excluded }
}
