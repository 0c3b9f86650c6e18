//! Catalog management: products and their variations.
//!
//! Products are edited through a [`ProductDraft`], the form buffer that
//! holds the product fields and one row per variation. Saving a draft
//! assigns identities and timestamps and upserts the product.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopkeep_core::{
    CartItem, Collection, KeyValueStore, PersistenceGateway, Product, ProductId,
    ProductVariation, ValidationError, VariationId, error::require,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AdminError, Result};

// =============================================================================
// Draft
// =============================================================================

/// One variation row in a [`ProductDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariationRow {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
}

/// Edit buffer for a product.
///
/// The buffer always keeps at least one variation row while it is being
/// edited. A stored product may still end up with none if it was loaded that
/// way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    editing: Option<Product>,
    pub name: String,
    pub price: Decimal,
    rows: Vec<VariationRow>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            editing: None,
            name: String::new(),
            price: Decimal::ZERO,
            rows: vec![VariationRow::default()],
        }
    }
}

impl ProductDraft {
    /// Blank draft for a new product, with one empty variation row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing product into the buffer.
    #[must_use]
    pub fn edit(product: &Product) -> Self {
        Self {
            editing: Some(product.clone()),
            name: product.name.clone(),
            price: product.price,
            rows: product
                .variations
                .iter()
                .map(|v| VariationRow {
                    name: v.name.clone(),
                    price: v.price,
                    stock: v.stock,
                })
                .collect(),
        }
    }

    /// The product being edited, if this is not a new product.
    #[must_use]
    pub const fn editing(&self) -> Option<&Product> {
        self.editing.as_ref()
    }

    #[must_use]
    pub fn rows(&self) -> &[VariationRow] {
        &self.rows
    }

    /// Append an empty variation row.
    pub fn add_variation(&mut self) {
        self.rows.push(VariationRow::default());
    }

    /// Remove the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::LastVariationRow` if only one row is left,
    /// or `ValidationError::NoSuchRow` if `index` is out of bounds.
    pub fn remove_variation(&mut self, index: usize) -> std::result::Result<VariationRow, ValidationError> {
        if index >= self.rows.len() {
            return Err(ValidationError::NoSuchRow(index));
        }
        if self.rows.len() <= 1 {
            return Err(ValidationError::LastVariationRow);
        }
        Ok(self.rows.remove(index))
    }

    /// Replace the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoSuchRow` if `index` is out of bounds.
    pub fn update_variation(
        &mut self,
        index: usize,
        row: VariationRow,
    ) -> std::result::Result<(), ValidationError> {
        let slot = self
            .rows
            .get_mut(index)
            .ok_or(ValidationError::NoSuchRow(index))?;
        *slot = row;
        Ok(())
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require(&self.name, "name")?;
        if self.price < Decimal::ZERO {
            return Err(negative("price"));
        }
        if self.rows.iter().any(|row| row.price < Decimal::ZERO) {
            return Err(negative("variation price"));
        }
        Ok(())
    }

    /// Build the product to store.
    ///
    /// A new product gets a fresh identity. Each variation keeps the identity
    /// the edited product had at the same index, otherwise it gets
    /// `"{product_id}_{index}"`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the name is blank or a price is
    /// negative.
    pub fn into_product(self, now: DateTime<Utc>) -> std::result::Result<Product, ValidationError> {
        self.validate()?;

        let id = self
            .editing
            .as_ref()
            .map_or_else(|| ProductId::new(Uuid::new_v4().to_string()), |p| p.id.clone());
        let previous: &[ProductVariation] = self
            .editing
            .as_ref()
            .map_or(&[], |p| p.variations.as_slice());

        let variations = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| ProductVariation {
                id: previous
                    .get(index)
                    .map_or_else(|| VariationId::derived(&id, index), |v| v.id.clone()),
                product_id: id.clone(),
                name: row.name,
                price: row.price,
                stock: row.stock,
            })
            .collect();

        Ok(Product {
            created_at: self.editing.as_ref().map_or(now, |p| p.created_at),
            id,
            name: self.name,
            price: self.price,
            variations,
            updated_at: now,
        })
    }
}

fn negative(field: &'static str) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        reason: "must not be negative".to_string(),
    }
}

// =============================================================================
// Manager
// =============================================================================

/// Products in the shop catalog.
#[derive(Debug)]
pub struct CatalogManager<'a, S> {
    gateway: &'a PersistenceGateway<S>,
}

impl<'a, S: KeyValueStore> CatalogManager<'a, S> {
    /// Create a new catalog manager.
    #[must_use]
    pub const fn new(gateway: &'a PersistenceGateway<S>) -> Self {
        Self { gateway }
    }

    /// All products, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<Product>> {
        Ok(self.gateway.load_collection(Collection::Products)?)
    }

    /// Find a product by identity.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn get(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.list()?.into_iter().find(|p| &p.id == id))
    }

    /// Insert or replace a product by identity.
    ///
    /// A replaced product keeps its stored `created_at`; `updated_at` is set
    /// to now either way.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn save_product(&self, mut product: Product) -> Result<Product> {
        let now = Utc::now();
        self.gateway
            .update_collection(Collection::Products, |products: &mut Vec<Product>| {
                product.updated_at = now;
                if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
                    product.created_at = existing.created_at;
                    *existing = product.clone();
                    tracing::info!("Product updated");
                } else {
                    product.created_at = now;
                    products.push(product.clone());
                    tracing::info!("Product created");
                }
                Ok::<_, AdminError>(product)
            })
    }

    /// Validate a draft and save the product it describes.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the draft is invalid, or
    /// `AdminError::Store` if the product cannot be saved.
    pub fn save_draft(&self, draft: ProductDraft) -> Result<Product> {
        let product = draft.into_product(Utc::now())?;
        self.save_product(product)
    }

    /// Delete a product and its variations. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn delete_product(&self, id: &ProductId) -> Result<bool> {
        let mut products: Vec<Product> = self.gateway.load_collection(Collection::Products)?;
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            tracing::debug!("Product not found, nothing to delete");
            return Ok(false);
        }
        self.gateway.save_collection(Collection::Products, &products)?;
        tracing::info!("Product deleted");
        Ok(true)
    }

    /// Build a cart line for a product, optionally one of its variations.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the product or variation does not
    /// exist or the variation has no stock, or `AdminError::Store` if the
    /// catalog cannot be read.
    pub fn cart_line(
        &self,
        product_id: &ProductId,
        variation_id: Option<&VariationId>,
        quantity: u32,
    ) -> Result<CartItem> {
        let product = self.get(product_id)?.ok_or_else(|| ValidationError::Unknown {
            kind: "product",
            id: product_id.to_string(),
        })?;

        let variation = match variation_id {
            Some(id) => {
                let variation = product.variation(id).ok_or_else(|| ValidationError::Unknown {
                    kind: "variation",
                    id: id.to_string(),
                })?;
                if !variation.in_stock() {
                    return Err(ValidationError::OutOfStock(variation.name.clone()).into());
                }
                Some(variation)
            }
            None => None,
        };

        Ok(CartItem::for_product(&product, variation, quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopkeep_core::MemoryStore;

    use super::*;

    fn row(name: &str, price: i64, stock: u32) -> VariationRow {
        VariationRow {
            name: name.to_string(),
            price: Decimal::new(price, 0),
            stock,
        }
    }

    fn draft(name: &str, rows: Vec<VariationRow>) -> ProductDraft {
        let mut draft = ProductDraft::new();
        draft.name = name.to_string();
        draft.price = Decimal::new(30, 0);
        for (index, r) in rows.into_iter().enumerate() {
            if index > 0 {
                draft.add_variation();
            }
            draft.update_variation(index, r).unwrap();
        }
        draft
    }

    #[test]
    fn test_new_draft_has_one_row_that_cannot_be_removed() {
        let mut draft = ProductDraft::new();
        assert_eq!(draft.rows().len(), 1);
        assert_eq!(
            draft.remove_variation(0),
            Err(ValidationError::LastVariationRow)
        );
        draft.add_variation();
        assert!(draft.remove_variation(1).is_ok());
        assert_eq!(draft.remove_variation(5), Err(ValidationError::NoSuchRow(5)));
    }

    #[test]
    fn test_draft_validation() {
        let blank = draft("  ", vec![row("P", 10, 1)]);
        assert_eq!(
            blank.into_product(Utc::now()),
            Err(ValidationError::MissingField("name"))
        );

        let negative_row = draft("Camiseta", vec![row("P", -1, 1)]);
        assert!(matches!(
            negative_row.into_product(Utc::now()),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_new_product_variation_ids_are_derived() {
        let product = draft("Camiseta", vec![row("P", 10, 1), row("M", 12, 0)])
            .into_product(Utc::now())
            .unwrap();
        assert_eq!(product.variations.len(), 2);
        assert_eq!(
            product.variations[1].id,
            VariationId::derived(&product.id, 1)
        );
        assert!(product.variations.iter().all(|v| v.product_id == product.id));
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn test_resave_keeps_ids_and_created_at() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let catalog = CatalogManager::new(&gateway);

        let first = catalog
            .save_draft(draft("Camiseta", vec![row("P", 10, 1), row("M", 12, 3)]))
            .unwrap();

        let mut edit = ProductDraft::edit(&first);
        edit.name = "Camiseta Básica".to_string();
        edit.add_variation();
        edit.update_variation(2, row("G", 14, 2)).unwrap();
        let second = catalog.save_draft(edit).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(second.variations[0].id, first.variations[0].id);
        assert_eq!(second.variations[1].id, first.variations[1].id);
        assert_eq!(second.variations[2].id, VariationId::derived(&first.id, 2));

        let listed = catalog.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Camiseta Básica");
    }

    #[test]
    fn test_delete_product() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let catalog = CatalogManager::new(&gateway);
        let product = catalog
            .save_draft(draft("Caneca", vec![row("Única", 0, 4)]))
            .unwrap();

        assert!(!catalog.delete_product(&ProductId::new("ghost")).unwrap());
        assert!(catalog.delete_product(&product.id).unwrap());
        assert!(catalog.get(&product.id).unwrap().is_none());
    }

    #[test]
    fn test_cart_line() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let catalog = CatalogManager::new(&gateway);
        let product = catalog
            .save_draft(draft("Camiseta", vec![row("P", 0, 2), row("M", 45, 0)]))
            .unwrap();
        let small = &product.variations[0].id;
        let medium = &product.variations[1].id;

        let line = catalog.cart_line(&product.id, Some(small), 2).unwrap();
        assert_eq!(line.price, Decimal::new(30, 0));
        assert_eq!(line.variation_name.as_deref(), Some("P"));
        assert_eq!(line.quantity, 2);

        let err = catalog.cart_line(&product.id, Some(medium), 1).unwrap_err();
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::OutOfStock(_))
        ));

        let err = catalog
            .cart_line(&product.id, Some(&VariationId::new("nope")), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Validation(ValidationError::Unknown { kind: "variation", .. })
        ));

        let base = catalog.cart_line(&product.id, None, 1).unwrap();
        assert!(base.variation_id.is_none());
        assert_eq!(base.price, Decimal::new(30, 0));
    }
}
