//! Shop summary figures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shopkeep_core::{Collection, Coupon, KeyValueStore, Order, PersistenceGateway, Product};

use crate::error::Result;

/// Number of orders shown in the recent list.
pub const RECENT_ORDERS: usize = 5;

/// Figures shown on the operator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub product_count: usize,
    pub order_count: usize,
    /// Coupons that are active and not yet expired.
    pub active_coupons: usize,
    /// Sum of all order totals.
    pub total_revenue: Decimal,
    /// The last orders placed, newest first.
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    /// Read every collection and compute the figures as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if a collection cannot be read.
    pub fn collect<S: KeyValueStore>(
        gateway: &PersistenceGateway<S>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let products: Vec<Product> = gateway.load_collection(Collection::Products)?;
        let coupons: Vec<Coupon> = gateway.load_collection(Collection::Coupons)?;
        let orders: Vec<Order> = gateway.load_collection(Collection::Orders)?;

        let total_revenue = orders.iter().map(|o| o.total).sum();
        let active_coupons = coupons.iter().filter(|c| c.is_live(now)).count();
        let recent_orders = orders.iter().rev().take(RECENT_ORDERS).cloned().collect();

        Ok(Self {
            product_count: products.len(),
            order_count: orders.len(),
            active_coupons,
            total_revenue,
            recent_orders,
        })
    }
}
