//! External services used by the storefront.
//!
//! # Services
//!
//! - `viacep` - Brazilian postal-code lookup used to pre-fill the delivery
//!   address at checkout

pub mod viacep;
