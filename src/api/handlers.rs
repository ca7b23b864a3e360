use std::num::IntErrorKind;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::RecommendRequest;

use super::AppState;

/// Query string of the recommend endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RecommendParams {
    #[serde(rename = "requestedItems")]
    pub requested_items: Option<String>,
}

impl RecommendParams {
    /// Number of products to return
    ///
    /// Non-numeric or missing values fall back to `default`; negative
    /// numbers mean no results and out-of-range numbers saturate.
    pub fn limit(&self, default: usize) -> usize {
        match self.requested_items.as_deref().map(|raw| raw.trim().parse::<i64>()) {
            Some(Ok(count)) => usize::try_from(count).unwrap_or(0),
            Some(Err(e)) => match e.kind() {
                IntErrorKind::PosOverflow => usize::MAX,
                IntErrorKind::NegOverflow => 0,
                _ => default,
            },
            None => default,
        }
    }
}

/// Parses a recommend body, accepting only JSON objects
pub fn parse_recommend_request(body: &[u8]) -> AppResult<RecommendRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::MalformedRequestBody(e.to_string()))?;

    if !value.is_object() {
        return Err(AppError::MalformedRequestBody(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AppError::MalformedRequestBody(e.to_string()))
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Ranks products for the posted events and returns their ids
pub async fn recommend(
    State(state): State<AppState>,
    params: Option<Query<RecommendParams>>,
    body: Bytes,
) -> AppResult<Json<Vec<String>>> {
    let limit = params
        .map(|Query(params)| params.limit(state.default_requested_items))
        .unwrap_or(state.default_requested_items);

    let request = parse_recommend_request(&body)?;

    tracing::info!(
        event_count = request.events.len(),
        requested_items = limit,
        "Scoring recommendation request"
    );

    let ranked = state
        .engine
        .recommend(&request.events, limit, state.clock.as_ref());

    tracing::info!(result_count = ranked.len(), "Recommendations ranked");

    Ok(Json(ranked.into_iter().map(|product| product.id).collect()))
}
