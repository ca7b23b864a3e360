use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use event_recommender::api::{create_router, AppState};
use event_recommender::models::WeightTable;
use event_recommender::services::{FixedClock, ScoringEngine};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

fn create_test_server() -> TestServer {
    create_server_with(AppState::default())
}

fn create_server_with(state: AppState) -> TestServer {
    let app = create_router(state.with_clock(FixedClock(NOW)));
    TestServer::new(app).unwrap()
}

async fn recommend(server: &TestServer, items: Option<&str>, body: Value) -> Vec<String> {
    let mut request = server.post("/recommend");
    if let Some(items) = items {
        request = request.add_query_param("requestedItems", items);
    }
    let response = request.json(&body).await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_single_view() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        Some("3"),
        json!({ "events": [
            { "name": "ProductDetailsView", "timestamp": NOW, "productIds": ["p1"] }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["p1"]);
}

#[tokio::test]
async fn test_purchased_product_is_excluded() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        Some("3"),
        json!({ "events": [
            { "name": "Purchase", "timestamp": NOW, "productIds": ["p1"] },
            { "name": "ProductAddToCart", "timestamp": NOW, "productIds": ["p1"] }
        ]}),
    )
    .await;

    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_cart_add_outranks_view() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        Some("1"),
        json!({ "events": [
            { "name": "ProductAddToCart", "timestamp": NOW, "productIds": ["p1"] },
            { "name": "ProductDetailsView", "timestamp": NOW, "productIds": ["p2"] }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["p1"]);
}

#[tokio::test]
async fn test_default_limit_is_three() {
    let server = create_test_server();
    let body = json!({ "events": [
        { "name": "ProductDetailsView", "timestamp": NOW, "productIds": ["a", "b", "c", "d", "e"] }
    ]});

    assert_eq!(recommend(&server, None, body.clone()).await, vec!["a", "b", "c"]);
    assert_eq!(recommend(&server, Some("lots"), body.clone()).await.len(), 3);
    assert_eq!(recommend(&server, Some("10"), body.clone()).await.len(), 5);
    assert!(recommend(&server, Some("0"), body).await.is_empty());
}

#[tokio::test]
async fn test_configured_default_limit() {
    let server = create_server_with(AppState::default().with_default_requested_items(1));
    let ids = recommend(
        &server,
        None,
        json!({ "events": [
            { "name": "ProductDetailsView", "timestamp": NOW, "productIds": ["a", "b"] }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["a"]);
}

#[tokio::test]
async fn test_recency_orders_equal_weights() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        None,
        json!({ "events": [
            { "name": "ProductDetailsView", "timestamp": NOW - 10 * DAY, "productIds": ["old"] },
            { "name": "ProductDetailsView", "timestamp": NOW - DAY, "productIds": ["recent"] }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["recent", "old"]);
}

#[tokio::test]
async fn test_nested_id_shapes() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        Some("5"),
        json!({ "events": [
            { "name": "ProductAddToCart", "timestamp": NOW,
              "data": { "products": [{ "id": "nested" }] } },
            { "name": "ProductDetailsView", "timestamp": NOW, "data": { "id": "embedded" } },
            { "name": "Purchase", "timestamp": NOW, "data": { "id": "bought" } },
            { "name": "ProductAddToCart", "timestamp": NOW, "data": { "id": "bought" } }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["nested", "embedded"]);
}

#[tokio::test]
async fn test_malformed_events_degrade_gracefully() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        None,
        json!({ "events": [
            7,
            { "timestamp": "yesterday", "productIds": ["no-name"] },
            { "name": "ProductDetailsView", "productIds": ["no-timestamp"] },
            { "name": "ProductDetailsView", "timestamp": NOW }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["no-timestamp", "no-name"]);
}

#[tokio::test]
async fn test_mixed_type_product_ids_keep_explicit_source() {
    let server = create_test_server();
    let ids = recommend(
        &server,
        None,
        json!({ "events": [
            { "name": "ProductDetailsView", "timestamp": NOW,
              "productIds": ["p1", 2], "data": { "id": "p9" } }
        ]}),
    )
    .await;

    assert_eq!(ids, vec!["p1"]);
}

#[tokio::test]
async fn test_missing_events_field_returns_empty() {
    let server = create_test_server();
    assert!(recommend(&server, None, json!({})).await.is_empty());
}

#[tokio::test]
async fn test_invalid_json_returns_empty_bad_request() {
    let server = create_test_server();

    let response = server.post("/recommend").text("{ not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Vec<String>>(), Vec::<String>::new());

    let response = server.post("/recommend").json(&json!([1, 2, 3])).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "[]");
}

#[tokio::test]
async fn test_server_survives_bad_requests() {
    let server = create_test_server();

    server
        .post("/recommend")
        .text("garbage")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_custom_weight_table() {
    let weights = WeightTable::new().with_weight("Wishlist", 50.0);
    let server = create_server_with(AppState::new(ScoringEngine::new(weights, 7.0)));

    let ids = recommend(
        &server,
        None,
        json!({ "events": [
            { "name": "ProductAddToCart", "timestamp": NOW, "productIds": ["cart"] },
            { "name": "Wishlist", "timestamp": NOW - 14 * DAY, "productIds": ["wish"] }
        ]}),
    )
    .await;

    // 50 * 0.25 beats the now-unmapped cart add at weight 1
    assert_eq!(ids, vec!["wish", "cart"]);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "3f0c1b7e-8a5e-4f5e-9c1d-2a7b6f4e8d90";

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;
    assert_eq!(response.header("x-request-id"), id);

    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());
}
