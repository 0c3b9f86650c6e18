//! Coupon management.
//!
//! Codes are stored upper-cased and matched case-insensitively. The first
//! time the shop starts, [`CouponManager::initialize_if_absent`] writes two
//! default coupons; after that the collection is never re-seeded, even if the
//! operator empties it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shopkeep_core::pricing::{CouponMatch, find_eligible_coupon};
use shopkeep_core::{
    Collection, Coupon, CouponId, DiscountKind, KeyValueStore, PersistenceGateway,
    ValidationError, error::require,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AdminError, Result};

/// Format of the expiry date typed by the operator.
const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Draft
// =============================================================================

/// Coupon form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponDraft {
    editing: Option<Coupon>,
    pub code: String,
    pub discount: Decimal,
    pub discount_type: DiscountKind,
    pub min_value: Decimal,
    /// Last day the coupon is offered, as `YYYY-MM-DD`.
    pub valid_until: String,
    pub is_active: bool,
}

impl Default for CouponDraft {
    fn default() -> Self {
        Self {
            editing: None,
            code: String::new(),
            discount: Decimal::ZERO,
            discount_type: DiscountKind::Percentage,
            min_value: Decimal::ZERO,
            valid_until: String::new(),
            is_active: true,
        }
    }
}

impl CouponDraft {
    /// Blank draft for a new coupon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing coupon into the form.
    #[must_use]
    pub fn edit(coupon: &Coupon) -> Self {
        Self {
            editing: Some(coupon.clone()),
            code: coupon.code.clone(),
            discount: coupon.discount,
            discount_type: coupon.discount_type,
            min_value: coupon.min_value,
            valid_until: coupon.valid_until.format(DATE_FORMAT).to_string(),
            is_active: coupon.is_active,
        }
    }

    /// Build the coupon to store.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the code is blank, an amount is out of
    /// range or the date is not `YYYY-MM-DD`.
    pub fn into_coupon(self, now: DateTime<Utc>) -> std::result::Result<Coupon, ValidationError> {
        require(&self.code, "code")?;
        if self.discount < Decimal::ZERO {
            return Err(out_of_range("discount", "must not be negative"));
        }
        if self.discount_type == DiscountKind::Percentage && self.discount > Decimal::ONE_HUNDRED {
            return Err(out_of_range("discount", "a percentage cannot exceed 100"));
        }
        if self.min_value < Decimal::ZERO {
            return Err(out_of_range("minValue", "must not be negative"));
        }
        let valid_until = parse_date(&self.valid_until)?;

        let (id, created_at) = self.editing.map_or_else(
            || (CouponId::new(Uuid::new_v4().to_string()), now),
            |c| (c.id, c.created_at),
        );

        Ok(Coupon {
            id,
            code: Coupon::normalize_code(&self.code),
            discount: self.discount,
            discount_type: self.discount_type,
            min_value: self.min_value,
            valid_until,
            is_active: self.is_active,
            created_at,
        })
    }
}

/// Parse a calendar date as UTC midnight.
fn parse_date(value: &str) -> std::result::Result<DateTime<Utc>, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate {
            field: "validUntil",
            value: value.to_string(),
        })
}

fn out_of_range(field: &'static str, reason: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        reason: reason.to_string(),
    }
}

/// The coupons written on first start.
#[must_use]
pub fn default_coupons(now: DateTime<Utc>) -> Vec<Coupon> {
    let midnight = |y, m, d| {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map_or(now, |at| at.and_utc())
    };

    vec![
        Coupon {
            id: CouponId::new("1"),
            code: "DESCONTO10".to_string(),
            discount: Decimal::TEN,
            discount_type: DiscountKind::Percentage,
            min_value: Decimal::new(50, 0),
            valid_until: midnight(2025, 12, 31),
            is_active: true,
            created_at: now,
        },
        Coupon {
            id: CouponId::new("2"),
            code: "FRETE15".to_string(),
            discount: Decimal::new(15, 0),
            discount_type: DiscountKind::Fixed,
            min_value: Decimal::ONE_HUNDRED,
            valid_until: midnight(2025, 6, 30),
            is_active: true,
            created_at: now,
        },
    ]
}

// =============================================================================
// Manager
// =============================================================================

/// Discount coupons.
#[derive(Debug)]
pub struct CouponManager<'a, S> {
    gateway: &'a PersistenceGateway<S>,
}

impl<'a, S: KeyValueStore> CouponManager<'a, S> {
    /// Create a new coupon manager.
    #[must_use]
    pub const fn new(gateway: &'a PersistenceGateway<S>) -> Self {
        Self { gateway }
    }

    /// Write the default coupons unless the coupon collection already exists.
    ///
    /// Returns whether the defaults were written.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the store cannot be read or written.
    #[instrument(skip(self))]
    pub fn initialize_if_absent(&self) -> Result<bool> {
        if self.gateway.has_collection(Collection::Coupons)? {
            tracing::debug!("Coupons already initialized");
            return Ok(false);
        }
        let defaults = default_coupons(Utc::now());
        self.gateway
            .save_collection(Collection::Coupons, &defaults)?;
        tracing::info!(count = defaults.len(), "Seeded default coupons");
        Ok(true)
    }

    /// All coupons, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn list(&self) -> Result<Vec<Coupon>> {
        Ok(self.gateway.load_collection(Collection::Coupons)?)
    }

    /// Find a coupon by identity.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn get(&self, id: &CouponId) -> Result<Option<Coupon>> {
        Ok(self.list()?.into_iter().find(|c| &c.id == id))
    }

    /// Insert or replace a coupon by identity.
    ///
    /// The code is normalized before storage. A replaced coupon keeps its
    /// stored `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    #[instrument(skip(self, coupon), fields(coupon_id = %coupon.id))]
    pub fn save_coupon(&self, mut coupon: Coupon) -> Result<Coupon> {
        coupon.code = Coupon::normalize_code(&coupon.code);
        self.gateway
            .update_collection(Collection::Coupons, |coupons: &mut Vec<Coupon>| {
                if let Some(existing) = coupons.iter_mut().find(|c| c.id == coupon.id) {
                    coupon.created_at = existing.created_at;
                    *existing = coupon.clone();
                    tracing::info!(code = %coupon.code, "Coupon updated");
                } else {
                    coupons.push(coupon.clone());
                    tracing::info!(code = %coupon.code, "Coupon created");
                }
                Ok::<_, AdminError>(coupon)
            })
    }

    /// Validate a draft and save the coupon it describes.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the draft is invalid, or
    /// `AdminError::Store` if the coupon cannot be saved.
    pub fn save_draft(&self, draft: CouponDraft) -> Result<Coupon> {
        let coupon = draft.into_coupon(Utc::now())?;
        self.save_coupon(coupon)
    }

    /// Flip a coupon between active and inactive, regardless of expiry.
    ///
    /// Returns the new state, or `None` if the coupon does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read or saved.
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub fn toggle_active(&self, id: &CouponId) -> Result<Option<bool>> {
        let mut coupons: Vec<Coupon> = self.gateway.load_collection(Collection::Coupons)?;
        let Some(coupon) = coupons.iter_mut().find(|c| &c.id == id) else {
            tracing::debug!("Coupon not found, nothing to toggle");
            return Ok(None);
        };
        coupon.is_active = !coupon.is_active;
        let active = coupon.is_active;
        self.gateway.save_collection(Collection::Coupons, &coupons)?;
        tracing::info!(active, "Coupon toggled");
        Ok(Some(active))
    }

    /// Match a typed code against the stored coupons.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Store` if the collection cannot be read.
    pub fn find_eligible(
        &self,
        code: &str,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CouponMatch> {
        Ok(find_eligible_coupon(&self.list()?, code, subtotal, now))
    }
}
