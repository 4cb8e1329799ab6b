//! Inference efficiency aggregation
//!
//! Combines per-system timing measurements into one efficiency figure.
//! Efficiency is a throughput claim across a fixed benchmark set, so partial
//! coverage is not a valid number: a single unmeasurable system collapses
//! the whole aggregate to missing. This is deliberately stricter than the
//! stability policy, which penalizes failures instead.

use crate::records::EfficiencyMeasurement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timing statistics pooled across benchmark systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyAggregate {
    /// Mean of per-system average times, µs/atom
    pub average_time: Option<f64>,
    /// Pooled standard deviation `sqrt(mean(σᵢ²))`, µs/atom
    pub standard_deviation: Option<f64>,
    /// Mean per-system success rate, 0–100 scale
    pub success_rate: f64,
}

impl EfficiencyAggregate {
    /// The all-failed aggregate
    pub fn unmeasured() -> Self {
        Self {
            average_time: None,
            standard_deviation: None,
            success_rate: 0.0,
        }
    }
}

/// Pool per-system measurements into one aggregate.
///
/// Any system with `average_time = None` (could not be measured at all)
/// invalidates the aggregate: `{None, None, 0.0}`.
pub fn aggregate_efficiency(
    systems: &BTreeMap<String, EfficiencyMeasurement>,
) -> EfficiencyAggregate {
    if systems.is_empty() || systems.values().any(|m| m.average_time.is_none()) {
        return EfficiencyAggregate::unmeasured();
    }

    let n = systems.len() as f64;
    let average_time = systems
        .values()
        .map(|m| m.average_time.unwrap_or(f64::NAN))
        .sum::<f64>()
        / n;

    // Pooled variance assuming equal per-system sample sizes. A system
    // measured without a spread estimate leaves the pooled figure undefined.
    let standard_deviation = systems
        .values()
        .map(|m| m.std_time)
        .try_fold(0.0_f64, |acc, std| std.map(|s| acc + s * s))
        .map(|sum| (sum / n).sqrt());

    let success_rate = systems.values().map(|m| m.success_rate).sum::<f64>() / n;

    EfficiencyAggregate {
        average_time: Some(average_time),
        standard_deviation,
        success_rate,
    }
}

/// Final efficiency score for ranking: `η₀ / η̄`. Higher is better.
pub fn efficiency_score(aggregate: &EfficiencyAggregate, reference: f64) -> Option<f64> {
    aggregate
        .average_time
        .filter(|avg| *avg > 0.0)
        .map(|avg| reference / avg)
}
