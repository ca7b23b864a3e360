use serde::{Deserialize, Serialize};

pub mod event;
pub mod weight_table;

pub use event::{Event, EventData, ProductRef, ProductSource, PURCHASE_EVENT};
pub use weight_table::{WeightTable, DEFAULT_WEIGHT};

/// A product identifier paired with its accumulated score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub id: String,
    pub score: f64,
}

/// Request body for the recommend endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default, deserialize_with = "event::deserialize_events")]
    pub events: Vec<Event>,
}
