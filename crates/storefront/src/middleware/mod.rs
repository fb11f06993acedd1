//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (`http_request` span with method, uri, status, latency)
//! 3. Request ID (record `x-request-id` on the span and response)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
