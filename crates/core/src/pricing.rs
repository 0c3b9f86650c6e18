//! Shipping, coupon discount and order total rules.
//!
//! Everything here is a pure function over the data model. Amounts use exact
//! decimal arithmetic; nothing is rounded until it is displayed.
//!
//! # Shipping bands
//!
//! | Subtotal               | Shipping |
//! |------------------------|----------|
//! | `>= 200`               | free     |
//! | `52 ..= 166.59`        | 15       |
//! | anything else          | 20       |
//!
//! Discounts are not capped and totals are not floored: a fixed coupon larger
//! than the order produces a negative total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Coupon, DiscountKind};
use crate::types::format_price;

/// Label shown instead of an amount when shipping is free.
pub const FREE_SHIPPING_LABEL: &str = "Frete Grátis";

/// Subtotal from which shipping is free.
pub const FREE_SHIPPING_FROM: Decimal = Decimal::from_parts(200, 0, 0, false, 0);
/// Lower bound (inclusive) of the reduced-rate band.
pub const REDUCED_BAND_FROM: Decimal = Decimal::from_parts(52, 0, 0, false, 0);
/// Upper bound (inclusive) of the reduced-rate band: 166.59.
pub const REDUCED_BAND_TO: Decimal = Decimal::from_parts(16659, 0, 0, false, 2);
/// Shipping inside the reduced-rate band.
pub const REDUCED_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);
/// Shipping everywhere else below the free threshold.
pub const STANDARD_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Shipping cost for a subtotal.
///
/// Callers never pass a negative subtotal.
#[must_use]
pub fn calculate_shipping(subtotal: Decimal) -> Decimal {
    if subtotal >= FREE_SHIPPING_FROM {
        Decimal::ZERO
    } else if subtotal >= REDUCED_BAND_FROM && subtotal <= REDUCED_BAND_TO {
        REDUCED_RATE
    } else {
        STANDARD_RATE
    }
}

/// Shipping as shown to the buyer: the free label or a formatted amount.
#[must_use]
pub fn shipping_display_text(subtotal: Decimal) -> String {
    let shipping = calculate_shipping(subtotal);
    if shipping.is_zero() {
        FREE_SHIPPING_LABEL.to_string()
    } else {
        format_price(shipping)
    }
}

/// Discount a coupon grants on a subtotal.
///
/// Eligibility is not checked here; see [`find_eligible_coupon`].
#[must_use]
pub fn apply_coupon(coupon: &Coupon, subtotal: Decimal) -> Decimal {
    match coupon.discount_type {
        DiscountKind::Percentage => subtotal * coupon.discount / Decimal::ONE_HUNDRED,
        DiscountKind::Fixed => coupon.discount,
    }
}

/// `subtotal + shipping - discount`.
#[must_use]
pub fn compute_order_total(subtotal: Decimal, shipping: Decimal, discount: Decimal) -> Decimal {
    subtotal + shipping - discount
}

/// The four figures shown in an order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Price an order from its subtotal and the applied coupon, if any.
    #[must_use]
    pub fn compute(subtotal: Decimal, coupon: Option<&Coupon>) -> Self {
        let shipping = calculate_shipping(subtotal);
        let discount = coupon.map_or(Decimal::ZERO, |c| apply_coupon(c, subtotal));
        Self {
            subtotal,
            shipping,
            discount,
            total: compute_order_total(subtotal, shipping, discount),
        }
    }
}

/// Result of matching a typed coupon code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponMatch {
    Eligible(Coupon),
    /// No coupon with that code is active, unexpired and within its minimum.
    NotEligible,
}

impl CouponMatch {
    #[must_use]
    pub fn into_coupon(self) -> Option<Coupon> {
        match self {
            Self::Eligible(coupon) => Some(coupon),
            Self::NotEligible => None,
        }
    }
}

/// Find the coupon a buyer's typed code refers to, if it applies.
///
/// The code is compared after trimming and upper-casing.
#[must_use]
pub fn find_eligible_coupon(
    coupons: &[Coupon],
    code: &str,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> CouponMatch {
    let wanted = Coupon::normalize_code(code);
    if wanted.is_empty() {
        return CouponMatch::NotEligible;
    }

    coupons
        .iter()
        .find(|c| Coupon::normalize_code(&c.code) == wanted && c.is_eligible(subtotal, now))
        .cloned()
        .map_or(CouponMatch::NotEligible, CouponMatch::Eligible)
}
