//! Application state shared by a storefront front end.

use std::sync::Arc;

use shopkeep_core::PersistenceGateway;

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::services::viacep::{LookupSequencer, ViaCepClient};
use crate::store::JsonFileStore;

/// Stores, lookup client and configuration for one storefront.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    shop: PersistenceGateway<JsonFileStore>,
    session: JsonFileStore,
    lookup: ViaCepClient,
    sequencer: LookupSequencer,
}

impl AppState {
    /// Open the data and session stores and build the lookup client.
    ///
    /// # Errors
    ///
    /// Returns an error if a store directory cannot be created or the HTTP
    /// client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let shop = PersistenceGateway::new(JsonFileStore::open(&config.data_dir)?);
        let session = JsonFileStore::open(&config.session_dir)?;
        let lookup = ViaCepClient::new(&config.lookup)?;

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            session_dir = %config.session_dir.display(),
            "Storefront state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shop,
                session,
                lookup,
                sequencer: LookupSequencer::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Products, coupons, orders and stock.
    #[must_use]
    pub fn shop(&self) -> &PersistenceGateway<JsonFileStore> {
        &self.inner.shop
    }

    /// Session-scoped store holding the cart.
    #[must_use]
    pub fn session(&self) -> &JsonFileStore {
        &self.inner.session
    }

    /// Postal-code lookup client.
    #[must_use]
    pub fn lookup(&self) -> &ViaCepClient {
        &self.inner.lookup
    }

    /// Sequencer for lookups fired from this session.
    #[must_use]
    pub fn sequencer(&self) -> &LookupSequencer {
        &self.inner.sequencer
    }
}
