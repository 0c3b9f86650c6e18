//! Command implementations.
//!
//! Output is written through `tracing::info!` so it follows the log format
//! chosen on the command line.

pub mod cart;
pub mod catalog;
pub mod coupons;
pub mod orders;

use thiserror::Error;

/// Errors specific to command handling.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No order has the given ID.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The coupon code is unknown, inactive, expired or below its minimum.
    #[error("Coupon {0} does not apply to this cart")]
    CouponNotEligible(String),
}

/// A state rooted in a fresh temporary directory.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_state() -> (tempfile::TempDir, shopkeep_storefront::AppState) {
    let dir = tempfile::TempDir::new().unwrap();
    let config = shopkeep_storefront::StorefrontConfig::with_data_dir(dir.path()).unwrap();
    let state = shopkeep_storefront::AppState::new(config).unwrap();
    (dir, state)
}
