//! Discount coupons.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CouponId, format_price};

/// How a coupon's `discount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `discount` is a percentage of the subtotal, in `0..=100`.
    Percentage,
    /// `discount` is a flat currency amount.
    Fixed,
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid discount type: {s}")),
        }
    }
}

/// A discount coupon.
///
/// Codes are case-insensitive and always stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub discount: Decimal,
    pub discount_type: DiscountKind,
    /// Minimum subtotal (inclusive) for the coupon to apply.
    pub min_value: Decimal,
    /// The coupon is valid strictly before this instant.
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Canonical form of a coupon code.
    #[must_use]
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Active and not yet expired at `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.valid_until > now
    }

    /// Whether the coupon applies to an order with this subtotal at `now`.
    #[must_use]
    pub fn is_eligible(&self, subtotal: Decimal, now: DateTime<Utc>) -> bool {
        self.is_live(now) && subtotal >= self.min_value
    }

    /// Short description shown next to an applied coupon.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.discount_type {
            DiscountKind::Percentage => format!("{}% de desconto", self.discount.normalize()),
            DiscountKind::Fixed => format!("{} de desconto", format_price(self.discount)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn coupon(kind: DiscountKind, discount: i64, min: Decimal) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new("c1"),
            code: "DESCONTO10".to_string(),
            discount: Decimal::new(discount, 0),
            discount_type: kind,
            min_value: min,
            valid_until: now + Duration::days(30),
            is_active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_min_value_boundary_is_inclusive() {
        let c = coupon(DiscountKind::Percentage, 10, Decimal::new(100, 0));
        let now = Utc::now();
        assert!(!c.is_eligible(Decimal::new(9999, 2), now));
        assert!(c.is_eligible(Decimal::new(10000, 2), now));
    }

    #[test]
    fn test_expiry_is_exclusive() {
        let c = coupon(DiscountKind::Fixed, 15, Decimal::ZERO);
        assert!(c.is_live(c.valid_until - Duration::milliseconds(1)));
        assert!(!c.is_live(c.valid_until));
    }

    #[test]
    fn test_inactive_never_eligible() {
        let mut c = coupon(DiscountKind::Fixed, 15, Decimal::ZERO);
        c.is_active = false;
        assert!(!c.is_eligible(Decimal::new(500, 0), Utc::now()));
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(Coupon::normalize_code(" desconto10 "), "DESCONTO10");
    }

    #[test]
    fn test_describe() {
        let pct = coupon(DiscountKind::Percentage, 10, Decimal::ZERO);
        assert_eq!(pct.describe(), "10% de desconto");
        let fixed = coupon(DiscountKind::Fixed, 15, Decimal::ZERO);
        assert_eq!(fixed.describe(), "R$ 15.00 de desconto");
    }

    #[test]
    fn test_discount_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&DiscountKind::Percentage).unwrap(),
            "\"percentage\""
        );
        assert_eq!("FIXED".parse::<DiscountKind>().unwrap(), DiscountKind::Fixed);
    }
}
