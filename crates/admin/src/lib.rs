//! Shopkeep admin: the operator side of the shop.
//!
//! Each manager borrows a [`PersistenceGateway`](shopkeep_core::PersistenceGateway)
//! and reads the collection fresh on every call, so several managers can
//! share one store.
//!
//! # Modules
//!
//! - [`catalog`] - products and their variations
//! - [`coupons`] - discount coupons, including the first-run defaults
//! - [`orders`] - order status changes
//! - [`inventory`] - per-variation stock records
//! - [`dashboard`] - summary figures

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod coupons;
pub mod dashboard;
pub mod error;
pub mod inventory;
pub mod orders;

pub use catalog::{CatalogManager, ProductDraft, VariationRow};
pub use coupons::{CouponDraft, CouponManager};
pub use dashboard::DashboardStats;
pub use error::{AdminError, Result};
pub use inventory::InventoryManager;
pub use orders::{OrderManager, StatusUpdate};
