//! Per-variation stock records.
//!
//! Records are keyed by `(product, variation)` and edited by the operator.
//! They are independent of the `stock` field on each variation and are not
//! touched by checkout.

use chrono::Utc;
use shopkeep_core::{
    Collection, KeyValueStore, PersistenceGateway, ProductId, StockRecord, VariationId,
};
use tracing::instrument;

use crate::error::{AdminError, Result};

/// Stock records.
#[derive(Debug)]
pub struct InventoryManager<'a, S> {
    gateway: &'a PersistenceGateway<S>,
}

impl<'a, S: KeyValueStore> InventoryManager<'a, S> {
    /// Create a new inventory manager.
    #[must_use]
    pub const fn new(gateway: &'a PersistenceGateway<S>) -> Self {
        Self { gateway }
    }

    /// All stock records.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<StockRecord>> {
        Ok(self.gateway.load_collection(Collection::Stock)?)
    }

    /// Records at or below their reorder threshold.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn low_stock(&self) -> Result<Vec<StockRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(StockRecord::is_low)
            .collect())
    }

    /// Insert or replace the record for `(product_id, variation_id)`,
    /// stamping `last_updated` with the current time.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    #[instrument(skip(self, record), fields(product_id = %record.product_id, quantity = record.quantity))]
    pub fn upsert(&self, mut record: StockRecord) -> Result<StockRecord> {
        record.last_updated = Utc::now();
        self.gateway
            .update_collection(Collection::Stock, |records: &mut Vec<StockRecord>| {
                match records
                    .iter_mut()
                    .find(|r| r.tracks(&record.product_id, record.variation_id.as_ref()))
                {
                    Some(existing) => *existing = record.clone(),
                    None => records.push(record.clone()),
                }
                if record.is_low() {
                    tracing::warn!(min_quantity = record.min_quantity, "Stock at or below minimum");
                }
                Ok::<_, AdminError>(record)
            })
    }

    /// Set the quantity and threshold for a product or variation.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    pub fn set(
        &self,
        product_id: ProductId,
        variation_id: Option<VariationId>,
        quantity: u32,
        min_quantity: u32,
    ) -> Result<StockRecord> {
        self.upsert(StockRecord {
            product_id,
            variation_id,
            quantity,
            min_quantity,
            last_updated: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopkeep_core::MemoryStore;

    use super::*;

    #[test]
    fn test_upsert_by_product_and_variation() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let inventory = InventoryManager::new(&gateway);
        let p1 = ProductId::new("p1");
        let small = VariationId::new("p1_0");

        inventory.set(p1.clone(), Some(small.clone()), 10, 2).unwrap();
        inventory.set(p1.clone(), None, 4, 1).unwrap();
        let updated = inventory.set(p1.clone(), Some(small.clone()), 1, 2).unwrap();

        let records = inventory.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], updated);
        assert_eq!(records[0].quantity, 1);

        let low = inventory.low_stock().unwrap();
        assert_eq!(low.len(), 1);
        assert!(low[0].tracks(&p1, Some(&small)));
    }

    #[test]
    fn test_upsert_stamps_last_updated() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let inventory = InventoryManager::new(&gateway);
        let stale = Utc::now() - chrono::Duration::days(3);
        let saved = inventory
            .upsert(StockRecord {
                product_id: ProductId::new("p1"),
                variation_id: None,
                quantity: 3,
                min_quantity: 0,
                last_updated: stale,
            })
            .unwrap();
        assert!(saved.last_updated > stale);
    }
}
