//! Cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductVariation};
use crate::types::{ProductId, VariationId};

/// One line in a buyer's cart.
///
/// Names and price are snapshots taken when the line was added; later catalog
/// edits do not reach into existing carts. A line is identified by
/// `(product_id, variation_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<VariationId>,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_name: Option<String>,
    /// Unit price snapshot.
    pub price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// Build a line for `quantity` units of a product, optionally a variation.
    #[must_use]
    pub fn for_product(
        product: &Product,
        variation: Option<&ProductVariation>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product.id.clone(),
            variation_id: variation.map(|v| v.id.clone()),
            product_name: product.name.clone(),
            variation_name: variation.map(|v| v.name.clone()),
            price: product.unit_price(variation),
            quantity,
        }
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn is_line(&self, product_id: &ProductId, variation_id: Option<&VariationId>) -> bool {
        &self.product_id == product_id && self.variation_id.as_ref() == variation_id
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Product name with the variation appended, e.g. `Camiseta (P)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.variation_name {
            Some(variation) => format!("{} ({variation})", self.product_name),
            None => self.product_name.clone(),
        }
    }
}
