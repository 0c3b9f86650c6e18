//! Order and dashboard commands.

use chrono::Utc;
use shopkeep_admin::{DashboardStats, OrderManager, StatusUpdate};
use shopkeep_core::{Order, OrderId, OrderStatus, format_price};
use shopkeep_storefront::AppState;
use tracing::info;

use super::CommandError;

fn summary(order: &Order) {
    info!(
        "#{}  {}  {}  {}  {}",
        order.id.short(),
        order.created_at.format("%d/%m/%Y %H:%M"),
        order.customer_info.name,
        order.status.label(),
        format_price(order.total)
    );
}

/// List orders, newest first.
///
/// # Errors
///
/// Returns an error if the orders cannot be read.
pub fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let orders = OrderManager::new(state.shop()).list()?;
    if orders.is_empty() {
        info!("No orders yet");
        return Ok(());
    }
    orders.iter().rev().for_each(summary);
    Ok(())
}

/// Show one order in full.
///
/// # Errors
///
/// Returns an error if the order does not exist or cannot be read.
pub fn show(state: &AppState, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let order = OrderManager::new(state.shop())
        .get(&OrderId::new(id))?
        .ok_or_else(|| CommandError::OrderNotFound(id.to_string()))?;

    summary(&order);
    let customer = &order.customer_info;
    info!("Cliente: {} <{}> {}", customer.name, customer.email, customer.phone);
    info!("Entrega: {}", customer.address.one_line());
    for line in &order.items {
        info!(
            "  {} x{} = {}",
            line.display_name(),
            line.quantity,
            format_price(line.line_total())
        );
    }
    info!("Subtotal: {}", format_price(order.subtotal));
    info!("Frete: {}", format_price(order.shipping));
    if let Some(code) = &order.coupon_code {
        info!("Desconto ({code}): -{}", format_price(order.discount));
    }
    info!("Total: {}", format_price(order.total));
    Ok(())
}

/// Set an order's status. An unknown ID changes nothing.
///
/// # Errors
///
/// Returns an error if the orders cannot be read or saved.
pub fn status(
    state: &AppState,
    id: &str,
    status: OrderStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    match OrderManager::new(state.shop()).update_status(&OrderId::new(id), status)? {
        StatusUpdate::Updated(order) => {
            info!("Order #{} is now {}", order.id.short(), order.status.label());
        }
        StatusUpdate::Removed(order) => {
            info!("Order #{} cancelled and removed", order.id.short());
        }
        StatusUpdate::NotFound => {
            info!(order_id = %id, "Order not found, nothing changed");
        }
    }
    Ok(())
}

/// Move an order to its next status.
///
/// # Errors
///
/// Returns an error if the order does not exist or cannot be saved.
pub fn advance(state: &AppState, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let orders = OrderManager::new(state.shop());
    let order_id = OrderId::new(id);
    if let Some(order) = orders.advance(&order_id)? {
        info!("Order #{} is now {}", order.id.short(), order.status.label());
        return Ok(());
    }
    match orders.get(&order_id)? {
        Some(order) => info!(
            "Order #{} is {}; nothing to advance",
            order.id.short(),
            order.status.label()
        ),
        None => return Err(CommandError::OrderNotFound(id.to_string()).into()),
    }
    Ok(())
}

/// Show shop summary figures.
///
/// # Errors
///
/// Returns an error if a collection cannot be read.
pub fn dashboard(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let stats = DashboardStats::collect(state.shop(), Utc::now())?;

    info!("Produtos: {}", stats.product_count);
    info!("Pedidos: {}", stats.order_count);
    info!("Cupons ativos: {}", stats.active_coupons);
    info!("Receita total: {}", format_price(stats.total_revenue));
    if !stats.recent_orders.is_empty() {
        info!("Pedidos recentes:");
        stats.recent_orders.iter().for_each(summary);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shopkeep_core::{Collection, CustomerInfo};

    use super::*;
    use crate::commands::test_state;

    fn seed_order(state: &AppState, millis: i64) -> OrderId {
        let order = Order {
            id: OrderId::from_millis(millis),
            items: Vec::new(),
            subtotal: Decimal::TEN,
            shipping: Decimal::new(20, 0),
            discount: Decimal::ZERO,
            total: Decimal::new(30, 0),
            coupon_code: None,
            customer_info: CustomerInfo::default(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        state
            .shop()
            .save_collection(Collection::Orders, std::slice::from_ref(&order))
            .unwrap();
        order.id
    }

    #[test]
    fn test_status_for_unknown_order_is_noop() {
        let (_dir, state) = test_state();
        let id = seed_order(&state, 1);

        status(&state, "123", OrderStatus::Delivered).unwrap();

        let orders = OrderManager::new(state.shop()).list().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, id);
        assert_eq!(orders[0].status, OrderStatus::Pending);
    }

    #[test]
    fn test_status_updates_known_order() {
        let (_dir, state) = test_state();
        let id = seed_order(&state, 1);

        status(&state, id.as_str(), OrderStatus::Shipped).unwrap();
        let order = OrderManager::new(state.shop()).get(&id).unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_lookups_of_unknown_order_fail() {
        let (_dir, state) = test_state();
        seed_order(&state, 1);

        assert!(show(&state, "123").is_err());
        assert!(advance(&state, "123").is_err());
    }
}
