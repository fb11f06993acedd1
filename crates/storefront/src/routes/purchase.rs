//! Purchase dialog route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delta_gear_core::{
    OrderSummary, PurchaseDialogId, PurchaseForm, PurchaseNotification, PurchaseStatus,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::products::ProductView;
use crate::services::PurchaseDialog;
use crate::state::AppState;

/// Request to open a purchase dialog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPurchaseRequest {
    pub product_id: String,
}

/// Purchase dialog snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResponse {
    pub id: PurchaseDialogId,
    pub product: ProductView,
    pub order_summary: OrderSummary,
    pub status: PurchaseStatus,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<PurchaseNotification>,
}

impl From<&PurchaseDialog> for DialogResponse {
    fn from(dialog: &PurchaseDialog) -> Self {
        Self {
            id: dialog.id(),
            product: ProductView::from(dialog.product()),
            order_summary: dialog.order_summary(),
            status: dialog.status(),
            open: dialog.is_open(),
            notification: dialog.notification(),
        }
    }
}

fn find_dialog(state: &AppState, id: &str) -> Result<Arc<PurchaseDialog>> {
    id.parse::<PurchaseDialogId>()
        .ok()
        .and_then(|id| state.purchases().get(id))
        .ok_or_else(|| AppError::NotFound(format!("purchase dialog {id}")))
}

/// Open a purchase dialog for a product.
///
/// POST /api/purchases
#[instrument(skip(state), fields(product = %body.product_id))]
pub async fn open(
    State(state): State<AppState>,
    Json(body): Json<OpenPurchaseRequest>,
) -> Result<(StatusCode, Json<DialogResponse>)> {
    let product = state.catalog().get_product(&body.product_id)?.clone();
    let dialog = state.purchases().open(product);

    Ok((
        StatusCode::CREATED,
        Json(DialogResponse::from(dialog.as_ref())),
    ))
}

/// Show a purchase dialog.
///
/// GET /api/purchases/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DialogResponse>> {
    let dialog = find_dialog(&state, &id)?;
    Ok(Json(DialogResponse::from(dialog.as_ref())))
}

/// Submit the shipping form.
///
/// POST /api/purchases/{id}/submit
///
/// Responds once the simulated processing delay has elapsed.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<PurchaseForm>,
) -> Result<Json<PurchaseNotification>> {
    let dialog = find_dialog(&state, &id)?;

    add_breadcrumb(
        "checkout",
        "Purchase submitted",
        Some(&[("product_id", dialog.product().id.as_str())]),
    );

    let notification = dialog.submit(&form).await?;
    tracing::info!(dialog_id = %dialog.id(), "Purchase notification sent");

    Ok(Json(notification))
}

/// Close a purchase dialog.
///
/// DELETE /api/purchases/{id}
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let closed = id
        .parse::<PurchaseDialogId>()
        .is_ok_and(|id| state.purchases().close(id));

    if closed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("purchase dialog {id}")))
    }
}
