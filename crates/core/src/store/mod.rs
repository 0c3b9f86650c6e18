//! Persistence of named collections over a key-value store.
//!
//! # Layers
//!
//! - [`KeyValueStore`] - raw string get/set/remove. Backends live where I/O is
//!   allowed: [`MemoryStore`] here, the JSON file store in the storefront
//!   crate.
//! - [`PersistenceGateway`] - typed `load_collection`/`save_collection` over
//!   any store. It owns JSON (de)serialization, so date fields round-trip as
//!   RFC 3339 strings and come back as `DateTime<Utc>`.
//!
//! Reads never write. A missing collection loads as empty; use
//! [`PersistenceGateway::has_collection`] to tell "absent" from "empty".

mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors raised by a store backend or while decoding a stored collection.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend I/O failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored value is not valid JSON for the expected type.
    #[error("corrupt data in {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend's internal lock was poisoned by a panic.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store.
///
/// Implementations use interior mutability so one store can be shared by
/// reference between the cart, checkout and managers.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Whether `key` holds a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        (**self).contains(key)
    }
}

/// Named collections and their storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Coupons,
    Orders,
    Stock,
    /// Session-scoped cart lines.
    Cart,
}

impl Collection {
    /// Storage key for this collection.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Products => "erp_products",
            Self::Coupons => "erp_coupons",
            Self::Orders => "erp_orders",
            Self::Stock => "erp_stock",
            Self::Cart => "cart",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Typed access to collections in a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load every item of a collection. A missing collection loads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored JSON does not decode as
    /// `Vec<T>`, or a backend error.
    pub fn load_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, StoreError> {
        let key = collection.key();
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replace a collection with `items`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encode` if an item cannot be encoded, or a backend
    /// error.
    pub fn save_collection<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> Result<(), StoreError> {
        let key = collection.key();
        let raw = serde_json::to_string(items).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)?;
        tracing::trace!(collection = %collection, items = items.len(), "Saved collection");
        Ok(())
    }

    /// Delete a collection entirely, so it reads as absent.
    ///
    /// # Errors
    ///
    /// Returns a backend error.
    pub fn remove_collection(&self, collection: Collection) -> Result<(), StoreError> {
        self.store.remove(collection.key())
    }

    /// Whether the collection has ever been written (and not removed).
    ///
    /// # Errors
    ///
    /// Returns a backend error.
    pub fn has_collection(&self, collection: Collection) -> Result<bool, StoreError> {
        self.store.contains(collection.key())
    }

    /// Load, change and save a collection in one step.
    ///
    /// `change` returns a value passed back to the caller. The collection is
    /// written only if `change` returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the load/save error, or the error produced by `change`.
    pub fn update_collection<T, R, E>(
        &self,
        collection: Collection,
        change: impl FnOnce(&mut Vec<T>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
    {
        let mut items = self.load_collection(collection)?;
        let outcome = change(&mut items)?;
        self.save_collection(collection, &items)?;
        Ok(outcome)
    }
}
