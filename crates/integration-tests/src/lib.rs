//! Integration tests for Delta Gear.
//!
//! Tests drive the full storefront router in-process with
//! `tower::ServiceExt::oneshot`; no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p delta-gear-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_properties` - Catalog and listing invariants over the seed data
//! - `storefront_api` - HTTP API for products, chat and purchases

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use delta_gear_storefront::{build_router, config::StorefrontConfig, state::AppState};

/// Largest response body the helpers will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Support reply window used by [`TestContext::new`].
pub const TEST_REPLY_MIN: Duration = Duration::from_millis(10);
/// Exclusive upper bound of the reply window.
pub const TEST_REPLY_MAX: Duration = Duration::from_millis(20);
/// Checkout processing delay used by [`TestContext::new`].
pub const TEST_PURCHASE_DELAY: Duration = Duration::from_millis(50);

/// A response decoded for assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, or `Value::Null` for empty and non-JSON bodies.
    pub body: Value,
}

/// Shared application state plus request helpers.
pub struct TestContext {
    pub state: AppState,
}

impl TestContext {
    /// Storefront with short, seeded chat and checkout delays.
    ///
    /// # Panics
    ///
    /// Panics if the seeded catalog is invalid.
    #[must_use]
    pub fn new() -> Self {
        let mut config = StorefrontConfig::default();
        config.chat.reply_delay_min = TEST_REPLY_MIN;
        config.chat.reply_delay_max = TEST_REPLY_MAX;
        config.chat.rng_seed = Some(7);
        config.purchase_delay = TEST_PURCHASE_DELAY;
        Self::with_config(config).expect("seeded catalog is valid")
    }

    /// Storefront with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the hero product is unknown.
    pub fn with_config(
        config: StorefrontConfig,
    ) -> Result<Self, delta_gear_core::CatalogError> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Send a request through a fresh router sharing this context's state.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = build_router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// POST `body` as JSON to `uri`.
    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// DELETE `uri`.
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
