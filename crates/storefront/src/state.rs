//! Application state shared across handlers.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use delta_gear_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::services::{ChatRegistry, PurchaseRegistry};

/// Longest pause between idle-session sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog and the live chat and checkout sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    chat: ChatRegistry,
    purchases: PurchaseRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured hero product is not in the catalog.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = Catalog::seeded_with_hero(&config.hero_product_id)?;
        let chat = ChatRegistry::new(config.chat_settings(), config.reply_picker());
        let purchases = PurchaseRegistry::new(config.purchase_settings());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                chat,
                purchases,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the live chat sessions.
    #[must_use]
    pub fn chat(&self) -> &ChatRegistry {
        &self.inner.chat
    }

    /// Get a reference to the open purchase dialogs.
    #[must_use]
    pub fn purchases(&self) -> &PurchaseRegistry {
        &self.inner.purchases
    }

    /// Discard chat sessions and purchase dialogs idle past the configured
    /// timeout. Returns the number of entries removed.
    pub fn sweep_idle_sessions(&self) -> usize {
        let ttl = self.config().session_idle_timeout;
        self.chat().sweep_idle(ttl) + self.purchases().sweep_idle(ttl)
    }

    /// Spawn a background task that periodically sweeps idle sessions.
    ///
    /// The task stops on its own once every `AppState` clone is dropped.
    pub fn start_session_sweeper(&self) -> JoinHandle<()> {
        let period = self
            .config()
            .session_idle_timeout
            .min(MAX_SWEEP_INTERVAL);
        let state: Weak<AppStateInner> = Arc::downgrade(&self.inner);

        info!(period_secs = period.as_secs(), "Spawning idle session sweeper");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = state.upgrade() else {
                    debug!("Application state dropped, stopping sweeper");
                    return;
                };
                Self { inner }.sweep_idle_sessions();
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state(idle_secs: u64) -> AppState {
        let config = StorefrontConfig {
            session_idle_timeout: Duration::from_secs(idle_secs),
            ..StorefrontConfig::default()
        };
        AppState::new(config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_discards_abandoned_sessions() {
        let state = state(30);
        let sweeper = state.start_session_sweeper();

        let session = state.chat().open();
        let dialog = state
            .purchases()
            .open(state.catalog().hero_product().clone());
        assert_eq!(state.chat().len(), 1);
        assert_eq!(state.purchases().len(), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(state.chat().is_empty());
        assert!(state.purchases().is_empty());
        assert!(session.is_closed());
        assert!(!dialog.is_open());
        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_with_state() {
        let state = state(30);
        let sweeper = state.start_session_sweeper();
        drop(state);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(sweeper.is_finished());
    }

    #[test]
    fn test_unknown_hero_is_rejected() {
        let config = StorefrontConfig {
            hero_product_id: "missing".to_string(),
            ..StorefrontConfig::default()
        };
        let err = AppState::new(config).err().unwrap();
        assert!(err.is_configuration_error());
    }
}
