use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::PURCHASE_EVENT;

/// Weight applied to event names missing from the table
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Static mapping from event name to a signed score weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: HashMap<String, f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::new()
            .with_weight("ProductDetailsView", 5.0)
            .with_weight("ProductAddToCart", 10.0)
            // Never applied: purchases only feed the exclusion set
            .with_weight(PURCHASE_EVENT, -100.0)
    }
}

impl WeightTable {
    /// Creates an empty table where every event gets [`DEFAULT_WEIGHT`]
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    /// Adds or replaces the weight for an event name
    pub fn with_weight(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(name.into(), weight);
        self
    }

    /// Parses a JSON object of `{ "EventName": weight }`
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Weight for an event name, falling back to [`DEFAULT_WEIGHT`]
    pub fn weight_for(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
