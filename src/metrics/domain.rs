//! Domain score aggregation
//!
//! Combines per-task normalized scores into one score per scientific domain.
//! Log-domain scores use a weighted exponential average so the aggregate
//! recovers a geometric-mean-like composite in linear space; scores that are
//! already linear use a plain weighted arithmetic mean.
//!
//! `None` entries (tasks whose contribution could not be computed) are
//! skipped with a warning rather than poisoning the whole domain; coverage
//! enforcement for the "Weighted" total lives with the caller, which knows
//! the expected task set.

use tracing::warn;

fn weighted_sum(scores: &[Option<f64>], weight_hint: Option<&[f64]>) -> Option<(f64, f64)> {
    if let Some(weights) = weight_hint {
        if weights.len() != scores.len() {
            warn!(
                scores = scores.len(),
                weights = weights.len(),
                "weight hint length mismatch, falling back to uniform weights"
            );
            return weighted_sum(scores, None);
        }
    }

    let mut total = 0.0;
    let mut weight_total = 0.0;
    let mut skipped = 0usize;
    for (i, score) in scores.iter().enumerate() {
        let weight = weight_hint.map_or(1.0, |w| w[i]);
        match score {
            Some(value) => {
                total += weight * value;
                weight_total += weight;
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, total = scores.len(), "skipped missing task scores in domain aggregate");
    }
    if weight_total == 0.0 {
        return None;
    }
    Some((total, weight_total))
}

/// Weighted exponential average of log-domain scores:
/// `exp(Σ wᵢ·scoreᵢ / Σ wᵢ)`.
///
/// `None` when every score is missing. Uniform weights when no hint is given.
pub fn exp_average(scores: &[Option<f64>], weight_hint: Option<&[f64]>) -> Option<f64> {
    weighted_sum(scores, weight_hint).map(|(total, weights)| (total / weights).exp())
}

/// Plain weighted arithmetic mean for scores that are already linear.
pub fn linear_average(scores: &[Option<f64>], weight_hint: Option<&[f64]>) -> Option<f64> {
    weighted_sum(scores, weight_hint).map(|(total, weights)| total / weights)
}
