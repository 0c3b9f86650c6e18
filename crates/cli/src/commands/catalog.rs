//! Product and stock commands.

use chrono::Utc;
use rust_decimal::Decimal;
use shopkeep_admin::{CatalogManager, InventoryManager, ProductDraft, VariationRow};
use shopkeep_core::{ProductId, VariationId, format_price};
use shopkeep_storefront::AppState;
use tracing::info;

/// Parse a `NAME:PRICE:STOCK` variation argument.
///
/// # Errors
///
/// Returns a message if the argument does not have three parts or a number
/// does not parse.
pub fn parse_variation(arg: &str) -> Result<VariationRow, String> {
    let mut parts = arg.rsplitn(3, ':');
    let (Some(stock), Some(price), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:PRICE:STOCK, got {arg:?}"));
    };
    Ok(VariationRow {
        name: name.trim().to_string(),
        price: price
            .trim()
            .parse()
            .map_err(|e| format!("invalid price {price:?}: {e}"))?,
        stock: stock
            .trim()
            .parse()
            .map_err(|e| format!("invalid stock {stock:?}: {e}"))?,
    })
}

/// List products and their variations.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let products = CatalogManager::new(state.shop()).list()?;
    if products.is_empty() {
        info!("No products");
    }
    for product in products {
        info!(
            "{} {} {} ({} in stock)",
            product.id,
            product.name,
            format_price(product.price),
            product.total_stock()
        );
        for variation in &product.variations {
            info!(
                "    {} {} {} stock {}",
                variation.id,
                variation.name,
                format_price(product.unit_price(Some(variation))),
                variation.stock
            );
        }
    }
    Ok(())
}

/// Add a product.
///
/// # Errors
///
/// Returns an error if the product is invalid or cannot be saved.
pub fn add(
    state: &AppState,
    name: String,
    price: Decimal,
    variations: Vec<VariationRow>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogManager::new(state.shop());
    let mut draft = ProductDraft::new();
    draft.name = name;
    draft.price = price;

    let product = if variations.is_empty() {
        // Sold at the base price only; drop the draft's blank row.
        let mut product = draft.into_product(Utc::now())?;
        product.variations.clear();
        catalog.save_product(product)?
    } else {
        for (index, row) in variations.into_iter().enumerate() {
            if index > 0 {
                draft.add_variation();
            }
            draft.update_variation(index, row)?;
        }
        catalog.save_draft(draft)?
    };
    info!(product_id = %product.id, "Added {}", product.name);
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or saved. An unknown ID
/// changes nothing.
pub fn delete(state: &AppState, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    if CatalogManager::new(state.shop()).delete_product(&ProductId::new(id))? {
        info!(product_id = %id, "Deleted");
    } else {
        info!(product_id = %id, "Product not found, nothing changed");
    }
    Ok(())
}

/// List stock records.
///
/// # Errors
///
/// Returns an error if the records cannot be read.
pub fn stock_list(state: &AppState, low_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let inventory = InventoryManager::new(state.shop());
    let records = if low_only {
        inventory.low_stock()?
    } else {
        inventory.list()?
    };
    if records.is_empty() {
        info!("No stock records");
    }
    for record in records {
        info!(
            "{}{} qty {} min {}{}",
            record.product_id,
            record
                .variation_id
                .as_ref()
                .map(|v| format!("/{v}"))
                .unwrap_or_default(),
            record.quantity,
            record.min_quantity,
            if record.is_low() { " LOW" } else { "" }
        );
    }
    Ok(())
}

/// Set a stock record.
///
/// # Errors
///
/// Returns an error if the record cannot be saved.
pub fn stock_set(
    state: &AppState,
    product: String,
    variation: Option<String>,
    quantity: u32,
    min_quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = InventoryManager::new(state.shop()).set(
        ProductId::new(product),
        variation.map(VariationId::new),
        quantity,
        min_quantity,
    )?;
    info!(
        product_id = %record.product_id,
        quantity = record.quantity,
        "Stock updated"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_state;

    #[test]
    fn test_delete_unknown_product_is_noop() {
        let (_dir, state) = test_state();
        add(&state, "Caneca".to_string(), Decimal::TEN, Vec::new()).unwrap();

        delete(&state, "missing").unwrap();
        assert_eq!(CatalogManager::new(state.shop()).list().unwrap().len(), 1);
    }

    #[test]
    fn test_add_without_variations_stores_none() {
        let (_dir, state) = test_state();
        add(&state, "Caneca".to_string(), Decimal::TEN, Vec::new()).unwrap();

        let products = CatalogManager::new(state.shop()).list().unwrap();
        assert!(products[0].variations.is_empty());
        delete(&state, products[0].id.as_str()).unwrap();
        assert!(CatalogManager::new(state.shop()).list().unwrap().is_empty());
    }

    #[test]
    fn test_parse_variation() {
        let row = parse_variation("Tamanho P:54.90:3").unwrap();
        assert_eq!(row.name, "Tamanho P");
        assert_eq!(row.price, Decimal::new(5490, 2));
        assert_eq!(row.stock, 3);
    }

    #[test]
    fn test_parse_variation_keeps_colons_in_name() {
        let row = parse_variation("Kit 2:1:0:5").unwrap();
        assert_eq!(row.name, "Kit 2:1");
        assert_eq!(row.stock, 5);
    }

    #[test]
    fn test_parse_variation_errors() {
        assert!(parse_variation("P:10").is_err());
        assert!(parse_variation("P:ten:1").is_err());
        assert!(parse_variation("P:10:-1").is_err());
    }
}
