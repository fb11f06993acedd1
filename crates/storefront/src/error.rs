//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use delta_gear_core::{CatalogError, FilterParseError, RequiredField};

use crate::services::{ChatError, PurchaseError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog lookup or configuration failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Chat operation failed.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Purchase submission was rejected.
    #[error("Purchase error: {0}")]
    Purchase(#[from] PurchaseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<FilterParseError> for AppError {
    fn from(err: FilterParseError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<RequiredField>>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => {
                if err.is_configuration_error() {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    StatusCode::NOT_FOUND
                }
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Purchase(PurchaseError::Interrupted(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Chat(ChatError::SessionClosed)
            | Self::Purchase(PurchaseError::InFlight | PurchaseError::Closed) => {
                StatusCode::CONFLICT
            }
            Self::Purchase(PurchaseError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match self {
            Self::Purchase(PurchaseError::Validation { missing }) => ErrorBody {
                error: "Please fill in all required fields.".to_string(),
                missing_fields: Some(missing),
            },
            err if err.is_server_error() => ErrorBody {
                error: "Internal server error".to_string(),
                missing_fields: None,
            },
            Self::Catalog(err) => ErrorBody {
                error: err.to_string(),
                missing_fields: None,
            },
            Self::Chat(err) => ErrorBody {
                error: err.to_string(),
                missing_fields: None,
            },
            Self::Purchase(err) => ErrorBody {
                error: err.to_string(),
                missing_fields: None,
            },
            Self::NotFound(msg) | Self::BadRequest(msg) => ErrorBody {
                error: msg,
                missing_fields: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Purchase submitted", Some(&[("product_id", "vortex-pro-phone")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
