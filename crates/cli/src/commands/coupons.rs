//! Coupon commands.

use chrono::Utc;
use rust_decimal::Decimal;
use shopkeep_admin::{CouponDraft, CouponManager};
use shopkeep_core::{CouponId, DiscountKind};
use shopkeep_storefront::AppState;
use tracing::info;

/// Coupon fields from the command line.
pub struct NewCoupon {
    pub code: String,
    pub discount: Decimal,
    pub kind: DiscountKind,
    pub min: Decimal,
    pub valid_until: String,
    pub active: bool,
}

/// Report whether startup seeded the default coupons.
pub fn init(seeded: bool) {
    if seeded {
        info!("Default coupons written");
    } else {
        info!("Coupons already initialized");
    }
}

/// List coupons.
///
/// # Errors
///
/// Returns an error if the coupons cannot be read.
pub fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let coupons = CouponManager::new(state.shop()).list()?;
    if coupons.is_empty() {
        info!("No coupons");
    }
    for coupon in coupons {
        let status = if !coupon.is_active {
            "inativo"
        } else if coupon.is_live(now) {
            "ativo"
        } else {
            "expirado"
        };
        info!(
            "{} {} - {} - min {} - até {} - {}",
            coupon.id,
            coupon.code,
            coupon.describe(),
            shopkeep_core::format_price(coupon.min_value),
            coupon.valid_until.format("%Y-%m-%d"),
            status
        );
    }
    Ok(())
}

/// Add a coupon.
///
/// # Errors
///
/// Returns an error if the coupon is invalid or cannot be saved.
pub fn add(state: &AppState, input: NewCoupon) -> Result<(), Box<dyn std::error::Error>> {
    let mut draft = CouponDraft::new();
    draft.code = input.code;
    draft.discount = input.discount;
    draft.discount_type = input.kind;
    draft.min_value = input.min;
    draft.valid_until = input.valid_until;
    draft.is_active = input.active;
    let coupon = CouponManager::new(state.shop()).save_draft(draft)?;
    info!(coupon_id = %coupon.id, "Added coupon {}", coupon.code);
    Ok(())
}

/// Flip a coupon between active and inactive.
///
/// # Errors
///
/// Returns an error if the coupons cannot be read or saved. An unknown ID
/// changes nothing.
pub fn toggle(state: &AppState, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    match CouponManager::new(state.shop()).toggle_active(&CouponId::new(id))? {
        Some(active) => info!(coupon_id = %id, active, "Coupon toggled"),
        None => info!(coupon_id = %id, "Coupon not found, nothing changed"),
    }
    Ok(())
}
