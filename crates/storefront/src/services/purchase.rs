//! Simulated one-click purchase.
//!
//! A purchase dialog is opened for one product, collects a shipping form and,
//! once the form is complete, "processes" the order for a fixed delay before
//! reporting success. No payment, inventory or persistence is involved and
//! there is no failure path.
//!
//! Each dialog allows a single in-flight submission. An accepted submission
//! runs on its own task, so it still completes if the caller goes away.
//! A completed dialog removes itself from the registry that opened it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, instrument, warn};

use delta_gear_core::{
    OrderSummary, Product, PurchaseDialogId, PurchaseForm, PurchaseNotification, PurchaseStatus,
    RequiredField,
};

/// Errors from submitting a purchase.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// Required shipping fields are blank.
    #[error("missing required fields: {}", format_fields(.missing))]
    Validation { missing: Vec<RequiredField> },

    /// A submission for this dialog is already processing.
    #[error("a purchase is already being processed")]
    InFlight,

    /// The dialog was closed or has already completed.
    #[error("purchase dialog is closed")]
    Closed,

    /// The processing task stopped before completing.
    #[error("purchase processing was interrupted: {0}")]
    Interrupted(String),
}

fn format_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Purchase timing.
#[derive(Debug, Clone)]
pub struct PurchaseSettings {
    /// How long a submission stays in processing.
    pub processing_delay: Duration,
}

impl Default for PurchaseSettings {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
        }
    }
}

type DialogMap = RwLock<HashMap<PurchaseDialogId, Arc<PurchaseDialog>>>;

#[derive(Debug)]
struct DialogState {
    status: PurchaseStatus,
    open: bool,
    notification: Option<PurchaseNotification>,
    last_activity: Instant,
}

/// Checkout dialog for a single product.
#[derive(Debug)]
pub struct PurchaseDialog {
    id: PurchaseDialogId,
    product: Product,
    processing_delay: Duration,
    state: Mutex<DialogState>,
    registry: Weak<DialogMap>,
}

impl PurchaseDialog {
    /// Open a dialog for `product`.
    #[must_use]
    pub fn new(product: Product, settings: &PurchaseSettings) -> Self {
        Self::registered(product, settings, Weak::new())
    }

    fn registered(product: Product, settings: &PurchaseSettings, registry: Weak<DialogMap>) -> Self {
        Self {
            id: PurchaseDialogId::generate(),
            product,
            processing_delay: settings.processing_delay,
            state: Mutex::new(DialogState {
                status: PurchaseStatus::Idle,
                open: true,
                notification: None,
                last_activity: Instant::now(),
            }),
            registry,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dialog identifier.
    #[must_use]
    pub const fn id(&self) -> PurchaseDialogId {
        self.id
    }

    /// The product being purchased.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Price breakdown for the order.
    #[must_use]
    pub const fn order_summary(&self) -> OrderSummary {
        OrderSummary::for_product(&self.product)
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> PurchaseStatus {
        self.lock().status
    }

    /// Whether the dialog is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Success notification, once the purchase has completed.
    #[must_use]
    pub fn notification(&self) -> Option<PurchaseNotification> {
        self.lock().notification.clone()
    }

    /// Close the dialog without purchasing.
    ///
    /// A submission already in flight still completes.
    pub fn close(&self) {
        self.lock().open = false;
    }

    /// Submit the shipping form.
    ///
    /// Validates the form, enters processing, waits the processing delay and
    /// then completes exactly once, closing the dialog.
    ///
    /// # Errors
    ///
    /// - [`PurchaseError::Validation`] if required fields are blank; the
    ///   dialog is left unchanged.
    /// - [`PurchaseError::InFlight`] if another submission is processing.
    /// - [`PurchaseError::Closed`] if the dialog is closed or completed.
    /// - [`PurchaseError::Interrupted`] if the processing task is aborted.
    #[instrument(skip(self, form), fields(dialog_id = %self.id, product = %self.product.id))]
    pub async fn submit(
        self: &Arc<Self>,
        form: &PurchaseForm,
    ) -> Result<PurchaseNotification, PurchaseError> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(PurchaseError::Validation { missing });
        }

        {
            let mut state = self.lock();
            if !state.open {
                return Err(PurchaseError::Closed);
            }
            match state.status {
                PurchaseStatus::Processing => return Err(PurchaseError::InFlight),
                PurchaseStatus::Completed => return Err(PurchaseError::Closed),
                PurchaseStatus::Idle => state.status = PurchaseStatus::Processing,
            }
            state.last_activity = Instant::now();
        }
        info!("Purchase processing");

        let dialog = Arc::clone(self);
        let task = tokio::spawn(async move {
            tokio::time::sleep(dialog.processing_delay).await;
            dialog.complete()
        });

        task.await.map_err(|e| {
            warn!(error = %e, "Purchase task did not finish");
            PurchaseError::Interrupted(e.to_string())
        })
    }

    fn complete(&self) -> PurchaseNotification {
        let notification = PurchaseNotification::for_product(&self.product);
        let mut state = self.lock();
        state.status = PurchaseStatus::Completed;
        state.open = false;
        state.notification = Some(notification.clone());
        drop(state);

        if let Some(dialogs) = self.registry.upgrade() {
            dialogs
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
        info!(dialog_id = %self.id, product = %self.product.id, "Purchase completed");
        notification
    }

    /// Whether the dialog has been untouched for `ttl` and is not processing.
    #[must_use]
    pub fn is_idle_for(&self, ttl: Duration) -> bool {
        let state = self.lock();
        state.status != PurchaseStatus::Processing && state.last_activity.elapsed() >= ttl
    }
}

/// Open purchase dialogs keyed by id.
#[derive(Debug, Default)]
pub struct PurchaseRegistry {
    settings: PurchaseSettings,
    dialogs: Arc<DialogMap>,
}

impl PurchaseRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(settings: PurchaseSettings) -> Self {
        Self {
            settings,
            dialogs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a dialog for a product.
    pub fn open(&self, product: Product) -> Arc<PurchaseDialog> {
        let dialog = Arc::new(PurchaseDialog::registered(
            product,
            &self.settings,
            Arc::downgrade(&self.dialogs),
        ));
        self.dialogs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dialog.id(), Arc::clone(&dialog));
        info!(dialog_id = %dialog.id(), product = %dialog.product().id, "Purchase dialog opened");
        dialog
    }

    /// Look up a dialog.
    #[must_use]
    pub fn get(&self, id: PurchaseDialogId) -> Option<Arc<PurchaseDialog>> {
        self.dialogs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Close and forget a dialog. Returns `false` if it was unknown.
    pub fn close(&self, id: PurchaseDialogId) -> bool {
        let removed = self
            .dialogs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        removed.is_some_and(|dialog| {
            dialog.close();
            true
        })
    }

    /// Close and forget every dialog idle for at least `ttl`.
    ///
    /// Dialogs still processing are kept. Returns the number removed.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let expired: Vec<Arc<PurchaseDialog>> = {
            let mut dialogs = self.dialogs.write().unwrap_or_else(PoisonError::into_inner);
            let ids: Vec<PurchaseDialogId> = dialogs
                .iter()
                .filter(|(_, dialog)| dialog.is_idle_for(ttl))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| dialogs.remove(id)).collect()
        };

        for dialog in &expired {
            dialog.close();
        }
        if !expired.is_empty() {
            info!(removed = expired.len(), remaining = self.len(), "Idle purchase dialogs swept");
        }
        expired.len()
    }

    /// Number of registered dialogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialogs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no dialogs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
