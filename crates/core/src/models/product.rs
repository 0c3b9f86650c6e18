//! Catalog products and their variations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, VariationId};

/// A catalog product.
///
/// A product with no variations sells at its base `price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Base price, used when no variation is selected.
    pub price: Decimal,
    #[serde(default)]
    pub variations: Vec<ProductVariation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable option of a product (e.g., a size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariation {
    /// Unique within the owning product.
    pub id: VariationId,
    /// Back-reference to the owning product.
    pub product_id: ProductId,
    pub name: String,
    /// Overrides the product's base price when this variation is selected.
    pub price: Decimal,
    pub stock: u32,
}

impl Product {
    /// Look up a variation by identity.
    #[must_use]
    pub fn variation(&self, id: &VariationId) -> Option<&ProductVariation> {
        self.variations.iter().find(|v| &v.id == id)
    }

    /// Unit price for a purchase of this product.
    ///
    /// A selected variation's price wins unless it is zero, in which case the
    /// base price applies.
    #[must_use]
    pub fn unit_price(&self, variation: Option<&ProductVariation>) -> Decimal {
        variation
            .map(|v| v.price)
            .filter(|price| !price.is_zero())
            .unwrap_or(self.price)
    }

    /// Total units in stock across all variations.
    #[must_use]
    pub fn total_stock(&self) -> u64 {
        self.variations.iter().map(|v| u64::from(v.stock)).sum()
    }
}

impl ProductVariation {
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        let id = ProductId::new("p1");
        let now = Utc::now();
        Product {
            id: id.clone(),
            name: "Camiseta".to_string(),
            price: Decimal::new(50, 0),
            variations: vec![
                ProductVariation {
                    id: VariationId::derived(&id, 0),
                    product_id: id.clone(),
                    name: "P".to_string(),
                    price: Decimal::new(45, 0),
                    stock: 3,
                },
                ProductVariation {
                    id: VariationId::derived(&id, 1),
                    product_id: id,
                    name: "G".to_string(),
                    price: Decimal::ZERO,
                    stock: 0,
                },
            ],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unit_price_prefers_variation() {
        let p = product();
        assert_eq!(p.unit_price(p.variations.first()), Decimal::new(45, 0));
        assert_eq!(p.unit_price(None), Decimal::new(50, 0));
    }

    #[test]
    fn test_zero_variation_price_falls_back_to_base() {
        let p = product();
        assert_eq!(p.unit_price(p.variations.get(1)), Decimal::new(50, 0));
    }

    #[test]
    fn test_variation_lookup_and_stock() {
        let p = product();
        let g = p.variation(&VariationId::new("p1_1")).unwrap();
        assert!(!g.in_stock());
        assert_eq!(p.total_stock(), 3);
        assert!(p.variation(&VariationId::new("p1_9")).is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(product()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["variations"][0]["productId"], "p1");
        assert_eq!(json["price"], "50");
    }
}
