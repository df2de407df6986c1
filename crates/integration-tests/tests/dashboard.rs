//! Dashboard loading against the mock API.

#![allow(clippy::unwrap_used)]

use oakline_client::dashboard::RECENT_ORDER_COUNT;
use oakline_client::{ApiClient, load_dashboard};
use oakline_core::LogTimeframe;
use oakline_integration_tests::{Method, MockApi, category_json, order_json};
use serde_json::json;

fn stub_dashboard(api: &MockApi) {
    api.respond(
        Method::GET,
        "/product/stock-status",
        200,
        json!({"data": {"total": 40, "inStock": 30, "lowStock": 7, "outOfStock": 3}}),
    );
    api.respond(
        Method::GET,
        "/category/get-all",
        200,
        json!([category_json(1, "Sofas"), category_json(2, "Beds")]),
    );
    let orders: Vec<_> = (1..=8)
        .map(|day| {
            let status = if day <= 3 { "pending" } else { "delivered" };
            order_json(day, status, &format!("2026-04-0{day}T09:00:00Z"))
        })
        .collect();
    api.respond(
        Method::GET,
        "/order/get-all",
        200,
        json!({"data": orders, "total": 8}),
    );
    api.respond(
        Method::GET,
        "/order/revenue-trend",
        200,
        json!([{"date": "2026-04-08", "revenue": "499.00", "orders": 1}]),
    );
    api.respond(
        Method::GET,
        "/log/stats",
        200,
        json!({"total": 52, "byLevel": {"error": 4, "info": 48}, "bySource": {"api": 52}}),
    );
}

#[tokio::test]
async fn test_dashboard_snapshot() {
    let api = MockApi::start().await;
    stub_dashboard(&api);

    let client = ApiClient::new(&api.config()).unwrap();
    let snapshot = load_dashboard(&client).await.unwrap();

    assert_eq!(snapshot.stock.low_stock, 7);
    assert_eq!(snapshot.category_count, 2);
    assert_eq!(snapshot.order_count, 8);
    assert_eq!(snapshot.pending_orders, 3);
    assert_eq!(snapshot.recent_orders.len(), RECENT_ORDER_COUNT as usize);
    assert_eq!(snapshot.recent_orders[0].id.as_i32(), 8);
    assert_eq!(snapshot.revenue.len(), 1);
    assert_eq!(snapshot.recent_errors, 4);

    assert_eq!(
        api.last_request(Method::GET, "/order/revenue-trend")
            .query
            .as_deref(),
        Some("days=30")
    );
    assert_eq!(
        api.last_request(Method::GET, "/log/stats").query.as_deref(),
        Some("timeframe=24h")
    );
}

#[tokio::test]
async fn test_dashboard_fails_as_a_whole() {
    let api = MockApi::start().await;
    stub_dashboard(&api);
    api.respond(Method::GET, "/log/stats", 403, json!({"message": "Forbidden"}));

    let client = ApiClient::new(&api.config()).unwrap();
    // The first queued stats response is the 200; drain it so the 403 is next.
    client.logs().stats(LogTimeframe::LastDay).await.unwrap();

    let err = load_dashboard(&client).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(
        err.user_message("load dashboard"),
        "Failed to load dashboard: please sign in again"
    );
}
