//! Integration tests for Shopkeep.
//!
//! Each test opens a fresh shop in a temporary directory using the same
//! file-backed stores the CLI uses, then drives the storefront and admin
//! crates against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopkeep-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shopkeep_admin::{CatalogManager, CouponDraft, CouponManager, ProductDraft, VariationRow};
use shopkeep_core::{Address, Coupon, CustomerInfo, DiscountKind, Product};
use shopkeep_storefront::{AppState, Cart, JsonFileStore, StorefrontConfig};
use tempfile::TempDir;

/// A shop rooted in a temporary directory.
///
/// The directory is removed when the value is dropped.
pub struct TestShop {
    dir: TempDir,
    pub state: AppState,
}

impl TestShop {
    /// Open an empty shop.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the stores cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn open() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = StorefrontConfig::with_data_dir(dir.path()).expect("Default config");
        let state = AppState::new(config).expect("Failed to open shop");
        Self { dir, state }
    }

    /// Open the same directories again, as a new process would.
    ///
    /// # Panics
    ///
    /// Panics if the stores cannot be reopened.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn reopen(self) -> Self {
        let config = StorefrontConfig::with_data_dir(self.dir.path()).expect("Default config");
        let state = AppState::new(config).expect("Failed to reopen shop");
        Self {
            dir: self.dir,
            state,
        }
    }

    /// The session cart.
    ///
    /// # Panics
    ///
    /// Panics if the saved cart cannot be read.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn cart(&self) -> Cart<&JsonFileStore> {
        Cart::restore(self.state.session()).expect("Failed to restore cart")
    }

    /// Save a product with the given `(name, price, stock)` variations.
    ///
    /// # Panics
    ///
    /// Panics if the product cannot be saved.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn add_product(&self, name: &str, price: i64, variations: &[(&str, i64, u32)]) -> Product {
        let mut draft = ProductDraft::new();
        draft.name = name.to_string();
        draft.price = Decimal::new(price, 0);
        for (index, (variation, price, stock)) in variations.iter().enumerate() {
            if index > 0 {
                draft.add_variation();
            }
            draft
                .update_variation(
                    index,
                    VariationRow {
                        name: (*variation).to_string(),
                        price: Decimal::new(*price, 0),
                        stock: *stock,
                    },
                )
                .expect("Row exists");
        }
        CatalogManager::new(self.state.shop())
            .save_draft(draft)
            .expect("Failed to save product")
    }

    /// Save an active coupon that expires thirty days from now.
    ///
    /// # Panics
    ///
    /// Panics if the coupon cannot be saved.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn add_coupon(&self, code: &str, kind: DiscountKind, discount: i64, min: i64) -> Coupon {
        let mut draft = CouponDraft::new();
        draft.code = code.to_string();
        draft.discount_type = kind;
        draft.discount = Decimal::new(discount, 0);
        draft.min_value = Decimal::new(min, 0);
        draft.valid_until = (Utc::now() + Duration::days(30)).format("%Y-%m-%d").to_string();
        CouponManager::new(self.state.shop())
            .save_draft(draft)
            .expect("Failed to save coupon")
    }
}

/// A buyer with every required field filled in.
#[must_use]
pub fn buyer() -> CustomerInfo {
    CustomerInfo {
        name: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        phone: "(11) 98765-4321".to_string(),
        address: Address {
            zip_code: "01310-100".to_string(),
            street: "Avenida Paulista".to_string(),
            number: "1000".to_string(),
            complement: None,
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        },
    }
}

/// Midnight UTC on the given day.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
#[allow(clippy::expect_used)]
pub fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("Valid date")
        .and_utc()
}
