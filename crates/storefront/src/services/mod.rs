//! Business logic services for storefront.
//!
//! # Services
//!
//! - `chat` - Simulated live-support chat with delayed canned replies
//! - `purchase` - Simulated one-click checkout dialogs

pub mod chat;
pub mod purchase;

pub use chat::{ChatError, ChatEvent, ChatRegistry, ChatSession, ChatSettings, ChatState, ReplyPicker};
pub use purchase::{PurchaseDialog, PurchaseError, PurchaseRegistry, PurchaseSettings};
