//! Shopkeep Core - domain types, pricing rules and persistence gateway.
//!
//! This crate is shared by every Shopkeep component:
//! - `storefront` - buyer side: cart, checkout, address lookup
//! - `admin` - operator side: catalog, coupons, orders, dashboard
//! - `cli` - command-line front end for both
//!
//! # Architecture
//!
//! The core crate performs no file or network I/O. Pricing is a set of pure
//! functions, and persistence is expressed as a [`KeyValueStore`] trait plus a
//! typed [`PersistenceGateway`]; concrete disk-backed stores live in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, postal code, money display, order status
//! - [`models`] - Products, coupons, cart lines, orders, stock records
//! - [`pricing`] - Shipping bands, coupon discounts, order totals
//! - [`store`] - Key-value store trait, in-memory store, persistence gateway
//! - [`error`] - Validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod models;
pub mod pricing;
pub mod store;
pub mod types;

pub use error::ValidationError;
pub use models::*;
pub use store::{Collection, KeyValueStore, MemoryStore, PersistenceGateway, StoreError};
pub use types::*;
