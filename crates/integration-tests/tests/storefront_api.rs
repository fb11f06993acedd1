//! Integration tests for the storefront HTTP API.
//!
//! Time is paused, so chat replies and checkout processing resolve as soon
//! as the runtime is otherwise idle.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};

use delta_gear_integration_tests::{TEST_PURCHASE_DELAY, TEST_REPLY_MAX, TestContext};
use delta_gear_storefront::config::StorefrontConfig;

fn ids(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

fn shipping_form() -> Value {
    json!({
        "email": "gamer@example.com",
        "fullName": "Alex Doe",
        "address": "123 Gaming Street",
        "city": "San Francisco",
        "zipCode": "94102",
        "country": "United States"
    })
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let resp = ctx.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_home_has_hero_and_featured() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/home").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["hero"]["id"], "titan-gaming-laptop");
    assert_eq!(resp.body["hero"]["priceDisplay"], "$6,999");

    let featured: Vec<_> = resp.body["featured"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        featured,
        [
            "vortex-pro-phone",
            "apex-ultra-phone",
            "storm-workstation-laptop"
        ]
    );
}

#[tokio::test]
async fn test_listing_filters_and_sorts() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/products?category=phone&sort=price-low").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(ids(&resp.body), ["vortex-pro-phone", "apex-ultra-phone"]);
    assert_eq!(resp.body["heading"], "Gaming Phones");
    assert_eq!(resp.body["count"], 2);
    assert_eq!(resp.body["category"], "phone");
    assert_eq!(resp.body["sort"], "price-low");
    assert_eq!(resp.body["sortOptions"].as_array().unwrap().len(), 4);
    assert_eq!(
        resp.body["sortOptions"][2],
        json!({ "value": "price-low", "label": "Price: Low to High" })
    );
}

#[tokio::test]
async fn test_listing_defaults_to_all_featured() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/products").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["count"], 4);
    assert_eq!(resp.body["heading"], "All Products");
    assert_eq!(resp.body["sort"], "featured");
}

#[tokio::test]
async fn test_listing_unknown_sort_falls_back_to_featured() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/products?sort=cheapest").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["sort"], "featured");
}

#[tokio::test]
async fn test_listing_unknown_category_is_rejected() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/products?category=tablet").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].as_str().unwrap().contains("tablet"));
}

#[tokio::test]
async fn test_product_detail_with_related() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/products/apex-ultra-phone").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["product"]["name"], "Apex Ultra Gaming Phone");
    assert_eq!(resp.body["product"]["onSale"], false);
    assert_eq!(resp.body["listingCategory"], "phone");
    let related = resp.body["relatedProducts"].as_array().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["id"], "vortex-pro-phone");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/products/nokia-3310").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[test]
fn test_unknown_hero_fails_startup() {
    let config = StorefrontConfig {
        hero_product_id: "missing-product".to_string(),
        ..StorefrontConfig::default()
    };
    assert!(TestContext::with_config(config).is_err());
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_chat_round_trip() {
    let ctx = TestContext::new();
    let opened = ctx.post("/api/chat/sessions", json!({})).await;
    assert_eq!(opened.status, StatusCode::CREATED);
    assert_eq!(opened.body["state"], "idle");
    assert_eq!(opened.body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(opened.body["messages"][0]["sender"], "support");

    let id = opened.body["id"].as_str().unwrap().to_string();
    let sent = ctx
        .post(
            &format!("/api/chat/sessions/{id}/messages"),
            json!({ "text": "Do you ship to Canada?" }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);
    assert_eq!(sent.body["sender"], "user");
    assert_eq!(sent.body["text"], "Do you ship to Canada?");

    let waiting = ctx.get(&format!("/api/chat/sessions/{id}")).await;
    assert_eq!(waiting.body["state"], "awaiting_reply");
    assert_eq!(waiting.body["pendingReplies"], 1);

    tokio::time::sleep(TEST_REPLY_MAX).await;

    let replied = ctx.get(&format!("/api/chat/sessions/{id}")).await;
    let messages = replied.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2]["sender"], "support");
    assert_eq!(replied.body["state"], "idle");
}

#[tokio::test(start_paused = true)]
async fn test_chat_blank_message_is_no_content() {
    let ctx = TestContext::new();
    let opened = ctx.post("/api/chat/sessions", json!({})).await;
    let id = opened.body["id"].as_str().unwrap().to_string();

    let sent = ctx
        .post(
            &format!("/api/chat/sessions/{id}/messages"),
            json!({ "text": "   " }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::NO_CONTENT);

    let session = ctx.get(&format!("/api/chat/sessions/{id}")).await;
    assert_eq!(session.body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(session.body["state"], "idle");
}

#[tokio::test(start_paused = true)]
async fn test_chat_close_cancels_reply() {
    let ctx = TestContext::new();
    let opened = ctx.post("/api/chat/sessions", json!({})).await;
    let id = opened.body["id"].as_str().unwrap().to_string();
    let session = ctx
        .state
        .chat()
        .get(id.parse().unwrap())
        .unwrap();

    ctx.post(
        &format!("/api/chat/sessions/{id}/messages"),
        json!({ "text": "hello?" }),
    )
    .await;
    let closed = ctx.delete(&format!("/api/chat/sessions/{id}")).await;
    assert_eq!(closed.status, StatusCode::NO_CONTENT);

    tokio::time::sleep(TEST_REPLY_MAX * 10).await;
    assert_eq!(session.messages().len(), 2);

    let gone = ctx.get(&format!("/api/chat/sessions/{id}")).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let again = ctx.delete(&format!("/api/chat/sessions/{id}")).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_unknown_session_is_not_found() {
    let ctx = TestContext::new();
    let resp = ctx.get("/api/chat/sessions/not-a-session").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Purchase
// =============================================================================

async fn open_dialog(ctx: &TestContext, product_id: &str) -> String {
    let resp = ctx
        .post("/api/purchases", json!({ "productId": product_id }))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    resp.body["id"].as_str().unwrap().to_string()
}

#[tokio::test(start_paused = true)]
async fn test_purchase_happy_path() {
    let ctx = TestContext::new();
    let id = open_dialog(&ctx, "vortex-pro-phone").await;

    let dialog = ctx.get(&format!("/api/purchases/{id}")).await;
    assert_eq!(dialog.body["status"], "idle");
    assert_eq!(dialog.body["open"], true);
    assert_eq!(dialog.body["orderSummary"]["total"], 2499);
    assert_eq!(dialog.body["orderSummary"]["shipping"], 0);

    let started = tokio::time::Instant::now();
    let submitted = ctx
        .post(&format!("/api/purchases/{id}/submit"), shipping_form())
        .await;
    assert_eq!(submitted.status, StatusCode::OK);
    assert!(started.elapsed() >= TEST_PURCHASE_DELAY);
    assert_eq!(submitted.body["productName"], "Vortex Pro Gaming Phone");

    // A completed dialog is discarded
    let done = ctx.get(&format!("/api/purchases/{id}")).await;
    assert_eq!(done.status, StatusCode::NOT_FOUND);
    assert!(ctx.state.purchases().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_purchase_validation_lists_missing_fields() {
    let ctx = TestContext::new();
    let id = open_dialog(&ctx, "titan-gaming-laptop").await;

    let mut form = shipping_form();
    form["city"] = json!("");
    form["zipCode"] = json!("  ");
    let resp = ctx.post(&format!("/api/purchases/{id}/submit"), form).await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["missingFields"], json!(["city", "zipCode"]));

    let dialog = ctx.get(&format!("/api/purchases/{id}")).await;
    assert_eq!(dialog.body["status"], "idle");
}

#[tokio::test(start_paused = true)]
async fn test_purchase_double_submit_is_conflict() {
    let ctx = TestContext::new();
    let id = open_dialog(&ctx, "storm-workstation-laptop").await;
    let uri = format!("/api/purchases/{id}/submit");

    let (first, second) = tokio::join!(
        ctx.post(&uri, shipping_form()),
        ctx.post(&uri, shipping_form())
    );
    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let resubmit = ctx.post(&uri, shipping_form()).await;
    assert_eq!(resubmit.status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_purchase_close_before_submit() {
    let ctx = TestContext::new();
    let id = open_dialog(&ctx, "apex-ultra-phone").await;

    let closed = ctx.delete(&format!("/api/purchases/{id}")).await;
    assert_eq!(closed.status, StatusCode::NO_CONTENT);

    let resp = ctx
        .post(&format!("/api/purchases/{id}/submit"), shipping_form())
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_purchase_completes_even_if_dialog_closed_mid_flight() {
    let ctx = TestContext::new();
    let id = open_dialog(&ctx, "vortex-pro-phone").await;
    let dialog = ctx.state.purchases().get(id.parse().unwrap()).unwrap();
    let uri = format!("/api/purchases/{id}/submit");

    let (submitted, ()) = tokio::join!(ctx.post(&uri, shipping_form()), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.state.purchases().close(dialog.id());
    });

    assert_eq!(submitted.status, StatusCode::OK);
    assert!(dialog.notification().is_some());
    assert!(ctx.state.purchases().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_many_checkouts_leave_no_dialogs_behind() {
    let ctx = TestContext::new();
    for _ in 0..50 {
        let id = open_dialog(&ctx, "apex-ultra-phone").await;
        let resp = ctx
            .post(&format!("/api/purchases/{id}/submit"), shipping_form())
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }
    assert_eq!(ctx.state.purchases().len(), 0);
}

#[tokio::test]
async fn test_purchase_unknown_product_is_not_found() {
    let ctx = TestContext::new();
    let resp = ctx
        .post("/api/purchases", json!({ "productId": "nokia-3310" }))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
