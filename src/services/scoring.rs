use std::collections::{HashMap, HashSet};

use crate::models::{Event, ScoredProduct, WeightTable};

use super::clock::Clock;

/// Default recency half-life in days
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 7.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Ranks products from a batch of behaviour events
///
/// Each non-purchase event adds `weight * 0.5^(age_days / half_life_days)`
/// to every product it references. Products referenced by a `Purchase` event
/// are excluded from the result no matter what else they scored.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: WeightTable,
    half_life_days: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(WeightTable::default(), DEFAULT_HALF_LIFE_DAYS)
    }
}

impl ScoringEngine {
    /// `half_life_days` must be finite and positive; `Config` validates this
    pub fn new(weights: WeightTable, half_life_days: f64) -> Self {
        Self {
            weights,
            half_life_days,
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn half_life_days(&self) -> f64 {
        self.half_life_days
    }

    /// Decay multiplier for an event `age_days` old
    ///
    /// Negative ages (future timestamps) yield a multiplier above 1.
    pub fn recency(&self, age_days: f64) -> f64 {
        0.5_f64.powf(age_days / self.half_life_days)
    }

    /// Scores `events` against the current time read once from `clock`
    pub fn recommend(
        &self,
        events: &[Event],
        limit: usize,
        clock: &dyn Clock,
    ) -> Vec<ScoredProduct> {
        self.score(events, limit, clock.now_secs())
    }

    /// Scores `events` as of `now` and returns at most `limit` products,
    /// highest score first
    ///
    /// Equal scores keep the order in which products were first scored.
    pub fn score(&self, events: &[Event], limit: usize, now: i64) -> Vec<ScoredProduct> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut scores: Vec<(&str, f64)> = Vec::new();
        let mut purchased: HashSet<&str> = HashSet::new();

        for event in events {
            let ids = event.product_ids();

            if event.is_purchase() {
                purchased.extend(ids);
                continue;
            }

            let weight = self.weights.weight_for(event.name());
            let contribution = weight * self.recency(age_days(now, event.timestamp));

            if !contribution.is_finite() {
                tracing::warn!(
                    event = %event.name(),
                    timestamp = ?event.timestamp,
                    "Skipping event with non-finite score contribution"
                );
                continue;
            }
            if contribution == 0.0 {
                continue;
            }

            for id in ids {
                match index.get(id) {
                    Some(&slot) => {
                        let total = scores[slot].1 + contribution;
                        if !total.is_finite() {
                            tracing::warn!(
                                product_id = %id,
                                "Score overflowed, saturating to a finite bound"
                            );
                        }
                        scores[slot].1 = total.clamp(f64::MIN, f64::MAX);
                    }
                    None => {
                        index.insert(id, scores.len());
                        scores.push((id, contribution));
                    }
                }
            }
        }

        let scored_count = scores.len();
        scores.retain(|(id, _)| !purchased.contains(id));
        // Stable, so ties stay in first-seen order
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores.truncate(limit);

        tracing::debug!(
            event_count = events.len(),
            scored_count,
            purchased_count = purchased.len(),
            result_count = scores.len(),
            "Scored events"
        );

        scores
            .into_iter()
            .map(|(id, score)| ScoredProduct {
                id: id.to_string(),
                score,
            })
            .collect()
    }
}

/// Age of an event in days; a missing timestamp counts as brand new
fn age_days(now: i64, timestamp: Option<f64>) -> f64 {
    match timestamp {
        Some(ts) => (now as f64 - ts) / SECONDS_PER_DAY,
        None => 0.0,
    }
}
