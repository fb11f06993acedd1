//! Core types for Delta Gear.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod chat;
pub mod id;
pub mod price;
pub mod product;
pub mod purchase;

pub use chat::{ChatMessage, ChatSender};
pub use id::*;
pub use price::Price;
pub use product::{Category, Product, ProductSpecs};
pub use purchase::{
    OrderSummary, PurchaseForm, PurchaseNotification, PurchaseStatus, RequiredField,
};
