//! Shopkeep storefront: the buyer side of the shop.
//!
//! # Modules
//!
//! - [`cart`] - session cart that persists after every change
//! - [`checkout`] - coupon entry, totals and order placement
//! - [`services`] - postal-code address lookup
//! - [`store`] - JSON file backend for the persistence gateway
//! - [`state`] - configuration and stores bundled for a front end
//!
//! Pricing rules live in `shopkeep_core::pricing`; this crate only applies
//! them to a live cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod store;

pub use cart::Cart;
pub use checkout::{Checkout, create_order};
pub use config::{ConfigError, LookupConfig, StorefrontConfig};
pub use error::{AppError, Result};
pub use services::viacep::{
    AddressLookup, LookupError, LookupOutcome, LookupSequencer, LookupTicket, ViaCepClient,
};
pub use state::AppState;
pub use store::JsonFileStore;
