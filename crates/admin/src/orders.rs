//! Order lifecycle management.
//!
//! The forward path is `pending -> confirmed -> shipped -> delivered`, and
//! any open order can be cancelled. Status updates are not checked against
//! that path: any status is accepted. Cancelling deletes the order record.

use shopkeep_core::{Collection, KeyValueStore, Order, OrderId, OrderStatus, PersistenceGateway};
use tracing::instrument;

use crate::error::Result;

/// What a status update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The order now has the new status.
    Updated(Order),
    /// The order was cancelled and removed.
    Removed(Order),
    /// No order has that identity.
    NotFound,
}

/// Orders placed at checkout.
#[derive(Debug)]
pub struct OrderManager<'a, S> {
    gateway: &'a PersistenceGateway<S>,
}

impl<'a, S: KeyValueStore> OrderManager<'a, S> {
    /// Create a new order manager.
    #[must_use]
    pub const fn new(gateway: &'a PersistenceGateway<S>) -> Self {
        Self { gateway }
    }

    /// All orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<Order>> {
        Ok(self.gateway.load_collection(Collection::Orders)?)
    }

    /// Find an order by identity.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn get(&self, id: &OrderId) -> Result<Option<Order>> {
        Ok(self.list()?.into_iter().find(|o| &o.id == id))
    }

    /// Set an order's status. Cancelling removes the order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<StatusUpdate> {
        let mut orders: Vec<Order> = self.gateway.load_collection(Collection::Orders)?;
        let Some(index) = orders.iter().position(|o| &o.id == id) else {
            tracing::debug!("Order not found, status unchanged");
            return Ok(StatusUpdate::NotFound);
        };

        let outcome = if status == OrderStatus::Cancelled {
            StatusUpdate::Removed(orders.remove(index))
        } else {
            let Some(order) = orders.get_mut(index) else {
                return Ok(StatusUpdate::NotFound);
            };
            order.status = status;
            StatusUpdate::Updated(order.clone())
        };

        self.gateway.save_collection(Collection::Orders, &orders)?;
        match &outcome {
            StatusUpdate::Removed(_) => tracing::info!("Order cancelled and removed"),
            _ => tracing::info!("Order status updated"),
        }
        Ok(outcome)
    }

    /// Move an order one step along the forward path.
    ///
    /// Returns `None` if the order does not exist or its status is terminal.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    pub fn advance(&self, id: &OrderId) -> Result<Option<Order>> {
        let Some(order) = self.get(id)? else {
            tracing::debug!(order_id = %id, "Order not found, nothing to advance");
            return Ok(None);
        };
        let Some(next) = order.status.next_step() else {
            tracing::debug!(order_id = %id, status = %order.status, "Order is terminal");
            return Ok(None);
        };

        match self.update_status(id, next)? {
            StatusUpdate::Updated(order) => Ok(Some(order)),
            StatusUpdate::Removed(_) | StatusUpdate::NotFound => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shopkeep_core::{CustomerInfo, MemoryStore};

    use super::*;

    fn order(millis: i64) -> Order {
        Order {
            id: OrderId::from_millis(millis),
            items: Vec::new(),
            subtotal: Decimal::new(100, 0),
            shipping: Decimal::new(15, 0),
            discount: Decimal::ZERO,
            total: Decimal::new(115, 0),
            coupon_code: None,
            customer_info: CustomerInfo::default(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn seeded() -> PersistenceGateway<MemoryStore> {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        gateway
            .save_collection(Collection::Orders, &[order(1), order(2)])
            .unwrap();
        gateway
    }

    #[test]
    fn test_update_status_in_place() {
        let gateway = seeded();
        let orders = OrderManager::new(&gateway);
        let id = OrderId::from_millis(2);

        let outcome = orders.update_status(&id, OrderStatus::Shipped).unwrap();
        assert!(matches!(outcome, StatusUpdate::Updated(ref o) if o.status == OrderStatus::Shipped));
        assert_eq!(orders.get(&id).unwrap().unwrap().status, OrderStatus::Shipped);
        assert_eq!(orders.list().unwrap().len(), 2);
    }

    #[test]
    fn test_cancel_removes_order() {
        let gateway = seeded();
        let orders = OrderManager::new(&gateway);
        let id = OrderId::from_millis(1);

        let outcome = orders.update_status(&id, OrderStatus::Cancelled).unwrap();
        assert!(matches!(outcome, StatusUpdate::Removed(ref o) if o.id == id));
        assert!(orders.get(&id).unwrap().is_none());
        assert_eq!(orders.list().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_order_is_noop() {
        let gateway = seeded();
        let orders = OrderManager::new(&gateway);
        let before = gateway.store().get("erp_orders").unwrap();

        let outcome = orders
            .update_status(&OrderId::new("missing"), OrderStatus::Delivered)
            .unwrap();
        assert_eq!(outcome, StatusUpdate::NotFound);
        assert_eq!(gateway.store().get("erp_orders").unwrap(), before);
    }

    #[test]
    fn test_any_status_is_accepted() {
        let gateway = seeded();
        let orders = OrderManager::new(&gateway);
        let id = OrderId::from_millis(1);
        orders.update_status(&id, OrderStatus::Delivered).unwrap();
        orders.update_status(&id, OrderStatus::Pending).unwrap();
        assert_eq!(orders.get(&id).unwrap().unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_advance_walks_forward_path() {
        let gateway = seeded();
        let orders = OrderManager::new(&gateway);
        let id = OrderId::from_millis(1);

        let mut seen = Vec::new();
        while let Some(order) = orders.advance(&id).unwrap() {
            seen.push(order.status);
        }
        assert_eq!(
            seen,
            [
                OrderStatus::Confirmed,
                OrderStatus::Shipped,
                OrderStatus::Delivered
            ]
        );
        assert!(orders.advance(&OrderId::new("missing")).unwrap().is_none());
    }
}
