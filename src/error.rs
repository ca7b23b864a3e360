use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Body was not valid JSON or not a JSON object
    #[error("Malformed request body: {0}")]
    MalformedRequestBody(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedRequestBody(reason) => {
                tracing::warn!(reason = %reason, "Rejecting malformed request body");
                // Clients always receive an id list, even on failure
                (StatusCode::BAD_REQUEST, Json(json!([]))).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_body_maps_to_bad_request() {
        let response = AppError::MalformedRequestBody("eof".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_message() {
        let error = AppError::MalformedRequestBody("expected object".to_string());
        assert_eq!(error.to_string(), "Malformed request body: expected object");
    }
}
