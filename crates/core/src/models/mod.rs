//! Persisted entities.
//!
//! Field names serialize in camelCase, amounts as decimal strings and
//! instants as RFC 3339 strings, so a stored collection reads back with
//! identical values.

pub mod cart;
pub mod coupon;
pub mod customer;
pub mod order;
pub mod product;
pub mod stock;

pub use cart::CartItem;
pub use coupon::{Coupon, DiscountKind};
pub use customer::{Address, AddressFragment, CustomerInfo};
pub use order::Order;
pub use product::{Product, ProductVariation};
pub use stock::StockRecord;
