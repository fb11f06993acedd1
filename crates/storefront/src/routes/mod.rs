//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//! GET  /api/home                        - Hero and featured products
//!
//! # Products
//! GET  /api/products                    - Product listing (?category=&sort=)
//! GET  /api/products/{id}               - Product detail with related products
//!
//! # Live chat
//! POST   /api/chat/sessions             - Open a session
//! GET    /api/chat/sessions/{id}        - Message log and state
//! POST   /api/chat/sessions/{id}/messages - Send a message
//! DELETE /api/chat/sessions/{id}        - Close a session
//!
//! # Purchase
//! POST   /api/purchases                 - Open a dialog for a product
//! GET    /api/purchases/{id}            - Dialog status and order summary
//! POST   /api/purchases/{id}/submit     - Submit the shipping form
//! DELETE /api/purchases/{id}            - Close a dialog
//! ```

pub mod chat;
pub mod home;
pub mod products;
pub mod purchase;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(chat::open))
        .route("/sessions/{id}", get(chat::show).delete(chat::close))
        .route("/sessions/{id}/messages", post(chat::send_message))
}

/// Create the purchase routes router.
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(purchase::open))
        .route("/{id}", get(purchase::show).delete(purchase::close))
        .route("/{id}/submit", post(purchase::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/home", get(home::home))
        .nest("/api/products", product_routes())
        .nest("/api/chat", chat_routes())
        .nest("/api/purchases", purchase_routes())
}
