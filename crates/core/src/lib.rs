//! Delta Gear Core - Catalog and shared types library.
//!
//! This crate provides the types and pure logic used by the storefront:
//! - `storefront` - HTTP surface and the chat/purchase simulators
//! - `integration-tests` - black-box tests against the catalog and router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no timers,
//! no HTTP. The catalog is built once at startup and never mutated, so it can
//! be shared freely behind an `Arc`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and prices, plus product, chat and
//!   purchase value types
//! - [`catalog`] - The seeded product catalog with hero/featured views
//! - [`filter`] - Category filtering and sorting for listing views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod filter;
pub mod types;

pub use catalog::{Catalog, CatalogError, DEFAULT_HERO_PRODUCT_ID};
pub use filter::{CategoryFilter, FilterParseError, SortKey, filter_and_sort};
pub use types::*;
