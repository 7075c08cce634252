//! Integration tests for order composition and lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and the demo catalog
//! - The server running (cargo run -p curbside-server)
//!
//! Run with: cargo test -p curbside-integration-tests -- --ignored

use curbside_core::OrderStatus;
use curbside_integration_tests::{base_url, client, scan_spot};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Test helper: Create an order for the session's binding and return it.
async fn create_order(client: &Client, items: Value) -> Value {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/orders"))
        .json(&json!({ "items": items }))
        .send()
        .await
        .expect("Failed to create order");

    assert!(resp.status().is_success(), "order creation failed");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    body["order"].clone()
}

// ============================================================================
// Order Composition
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn order_total_comes_from_the_catalog_not_the_client() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;

    // Catalog prices: burger 89.00, size-large +15.00, extra-cheese +10.00.
    // The absurd unitPrice hint must be ignored: (89+15+10)*2 = 228.00.
    let order = create_order(
        &client,
        json!([{
            "productId": "demo-burger-1",
            "quantity": 2,
            "unitPrice": "0.01",
            "modifierOptionIds": ["demo-size-large", "demo-extra-cheese"]
        }]),
    )
    .await;

    assert_eq!(order["total"], "228.00");
    assert_eq!(order["status"], "pending");

    let items = order["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["price"], "89.00");
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["modifiers"].as_array().expect("modifiers").len(), 2);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn empty_cart_is_rejected_and_persists_nothing() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let before = recent_order_count(&client).await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .expect("Failed to post order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(recent_order_count(&client).await, before);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn unknown_modifier_option_is_a_hard_error() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/orders"))
        .json(&json!({ "items": [{
            "productId": "demo-burger-1",
            "quantity": 1,
            "modifierOptionIds": ["no-such-option"]
        }]}))
        .send()
        .await
        .expect("Failed to post order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn business_and_spot_are_inferred_without_a_session() {
    // No scan: the business comes from the first product, the spot from the
    // business's default location.
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/orders"))
        .json(&json!({ "items": [{
            "productId": "demo-burger-1",
            "quantity": 1
        }]}))
        .send()
        .await
        .expect("Failed to post order");

    assert!(resp.status().is_success());
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["order"]["parkingSpotId"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn listing_is_newest_first_and_scoped_to_the_session() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let first = create_order(
        &client,
        json!([{ "productId": "demo-burger-1", "quantity": 1 }]),
    )
    .await;
    let second = create_order(
        &client,
        json!([{ "productId": "demo-burger-1", "quantity": 2 }]),
    )
    .await;

    let resp = client
        .get(format!("{base}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.expect("Failed to parse response");

    let orders = body["orders"].as_array().expect("orders array");
    assert!(orders.len() >= 2);
    assert!(orders.len() <= 20);

    // Newest first.
    assert_eq!(orders[0]["id"], second["id"]);
    assert_eq!(orders[1]["id"], first["id"]);
}

// ============================================================================
// Order Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn status_walks_the_lifecycle_without_touching_the_total() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let order = create_order(
        &client,
        json!([{ "productId": "demo-burger-1", "quantity": 1 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");
    let total = order["total"].clone();

    for status in [
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        let resp = client
            .post(format!("{base}/api/orders/{id}/status"))
            .json(&json!({ "status": status.as_str() }))
            .send()
            .await
            .expect("Failed to update status");
        assert!(resp.status().is_success());

        let body: Value = resp.json().await.expect("Failed to parse response");
        assert_eq!(body["order"]["status"], status.as_str());
        assert_eq!(body["order"]["total"], total);
    }
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn bogus_status_is_rejected_without_mutation() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let order = create_order(
        &client,
        json!([{ "productId": "demo-burger-1", "quantity": 1 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");

    let resp = client
        .post(format!("{base}/api/orders/{id}/status"))
        .json(&json!({ "status": "bogus" }))
        .send()
        .await
        .expect("Failed to post status");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Status is unchanged.
    let resp = client
        .get(format!("{base}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    let body: Value = resp.json().await.expect("Failed to parse response");
    let listed = body["orders"]
        .as_array()
        .expect("orders array")
        .iter()
        .find(|o| o["id"] == order["id"])
        .expect("order in listing")
        .clone();
    assert_eq!(listed["status"], "pending");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn completed_orders_reject_further_transitions() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let order = create_order(
        &client,
        json!([{ "productId": "demo-burger-1", "quantity": 1 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");

    let resp = client
        .post(format!("{base}/api/orders/{id}/status"))
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .expect("Failed to update status");
    assert!(resp.status().is_success());

    let resp = client
        .post(format!("{base}/api/orders/{id}/status"))
        .json(&json!({ "status": "preparing" }))
        .send()
        .await
        .expect("Failed to post status");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn form_posts_redirect_back_to_the_dashboard() {
    let client = client();
    scan_spot(&client, "demo-location", "spot-a1").await;
    let base = base_url();

    let order = create_order(
        &client,
        json!([{ "productId": "demo-burger-1", "quantity": 1 }]),
    )
    .await;
    let id = order["id"].as_str().expect("order id");

    // The staff dashboard submits a plain form.
    let resp = client
        .post(format!("{base}/api/orders/{id}/status"))
        .form(&[("status", "preparing")])
        .send()
        .await
        .expect("Failed to post status form");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("form post must redirect");
    assert_eq!(location, "/dashboard/orders");
}

#[tokio::test]
#[ignore = "Requires running server and seeded database"]
async fn unknown_order_is_not_found() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/orders/no-such-order/status"))
        .json(&json!({ "status": "preparing" }))
        .send()
        .await
        .expect("Failed to post status");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Helpers
// ============================================================================

/// Number of orders currently visible to the session.
async fn recent_order_count(client: &Client) -> usize {
    let base = base_url();
    let resp = client
        .get(format!("{base}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    let body: Value = resp.json().await.expect("Failed to parse response");
    body["orders"].as_array().map_or(0, Vec::len)
}
