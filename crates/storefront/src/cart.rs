//! The buyer's session cart.
//!
//! The cart is an ordered list of [`CartItem`] lines, at most one per
//! `(product, variation)` pair. Every mutation writes the whole list back to
//! the session store before it becomes visible, so the persisted cart always
//! matches what [`Cart::items`] returns.

use rust_decimal::Decimal;
use shopkeep_core::{
    CartItem, Collection, KeyValueStore, PersistenceGateway, ProductId, StoreError, VariationId,
};
use tracing::instrument;

/// Session cart persisted under [`Collection::Cart`].
#[derive(Debug)]
pub struct Cart<S> {
    gateway: PersistenceGateway<S>,
    items: Vec<CartItem>,
}

impl<S: KeyValueStore> Cart<S> {
    /// Load the cart saved in `session`, or start empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the saved cart cannot be read or decoded.
    pub fn restore(session: S) -> Result<Self, StoreError> {
        let gateway = PersistenceGateway::new(session);
        let items = gateway.load_collection(Collection::Cart)?;
        Ok(Self { gateway, items })
    }

    /// Cart lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, merging quantities with an existing line of the same
    /// product and variation.
    ///
    /// A zero-quantity line is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be saved; the cart is unchanged.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub fn add_to_cart(&mut self, item: CartItem) -> Result<(), StoreError> {
        if item.quantity == 0 {
            tracing::debug!("Ignoring zero-quantity add");
            return Ok(());
        }

        let mut next = self.items.clone();
        match next
            .iter_mut()
            .find(|line| line.is_line(&item.product_id, item.variation_id.as_ref()))
        {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => next.push(item),
        }
        self.commit(next)
    }

    /// Remove the line for a product/variation. Removing an absent line is a
    /// no-op.
    ///
    /// Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be saved; the cart is unchanged.
    pub fn remove_from_cart(
        &mut self,
        product_id: &ProductId,
        variation_id: Option<&VariationId>,
    ) -> Result<bool, StoreError> {
        let next: Vec<CartItem> = self
            .items
            .iter()
            .filter(|line| !line.is_line(product_id, variation_id))
            .cloned()
            .collect();
        if next.len() == self.items.len() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Set a line's quantity. Zero or less removes the line; an absent line
    /// is left absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be saved; the cart is unchanged.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        variation_id: Option<&VariationId>,
        quantity: i64,
    ) -> Result<(), StoreError> {
        if quantity <= 0 {
            self.remove_from_cart(product_id, variation_id)?;
            return Ok(());
        }

        if !self.items.iter().any(|line| line.is_line(product_id, variation_id)) {
            tracing::debug!(product_id = %product_id, "No such cart line, quantity unchanged");
            return Ok(());
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let mut next = self.items.clone();
        for line in next
            .iter_mut()
            .filter(|line| line.is_line(product_id, variation_id))
        {
            line.quantity = quantity;
        }
        self.commit(next)
    }

    /// Empty the cart and drop it from the session store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the saved cart cannot be removed.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.gateway.remove_collection(Collection::Cart)?;
        self.items.clear();
        tracing::debug!("Cart cleared");
        Ok(())
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    fn commit(&mut self, next: Vec<CartItem>) -> Result<(), StoreError> {
        self.gateway.save_collection(Collection::Cart, &next)?;
        self.items = next;
        Ok(())
    }
}
