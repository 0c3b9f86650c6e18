//! Per-variation stock records.
//!
//! Kept separately from the `stock` count on each variation. Checkout does
//! not read or decrement these records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, VariationId};

/// Stock level for a product, or one of its variations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariationId>,
    pub quantity: u32,
    /// Reorder threshold.
    pub min_quantity: u32,
    pub last_updated: DateTime<Utc>,
}

impl StockRecord {
    /// At or below the reorder threshold.
    #[must_use]
    pub const fn is_low(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    /// Whether this record tracks the given product/variation pair.
    #[must_use]
    pub fn tracks(&self, product_id: &ProductId, variation_id: Option<&VariationId>) -> bool {
        &self.product_id == product_id && self.variation_id.as_ref() == variation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_low() {
        let mut record = StockRecord {
            product_id: ProductId::new("p1"),
            variation_id: None,
            quantity: 5,
            min_quantity: 5,
            last_updated: Utc::now(),
        };
        assert!(record.is_low());
        record.quantity = 6;
        assert!(!record.is_low());
    }
}
