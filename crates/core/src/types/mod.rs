//! Value types shared across Shopkeep.
//!
//! This module provides type-safe wrappers for identities, money display,
//! buyer contact fields and order status.

pub mod email;
pub mod id;
pub mod postal_code;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use postal_code::PostalCode;
pub use price::{CurrencyCode, format_price};
pub use status::OrderStatus;
