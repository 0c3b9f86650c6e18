//! Default coupons and coupon administration.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::Utc;
use rust_decimal::Decimal;
use shopkeep_admin::CouponManager;
use shopkeep_core::pricing::CouponMatch;
use shopkeep_core::{Collection, DiscountKind};
use shopkeep_integration_tests::{TestShop, midnight};

// ============================================================================
// Seed Tests
// ============================================================================

#[test]
fn test_seeds_written_once() {
    let shop = TestShop::open();
    let coupons = CouponManager::new(shop.state.shop());

    assert!(coupons.initialize_if_absent().unwrap());
    let seeded = coupons.list().unwrap();
    let codes: Vec<_> = seeded.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, ["DESCONTO10", "FRETE15"]);
    assert_eq!(seeded[0].valid_until, midnight(2025, 12, 31));
    assert_eq!(seeded[1].valid_until, midnight(2025, 6, 30));
    assert_eq!(seeded[1].discount_type, DiscountKind::Fixed);

    assert!(!coupons.initialize_if_absent().unwrap());
    assert_eq!(coupons.list().unwrap(), seeded);
}

#[test]
fn test_cleared_collection_is_not_reseeded() {
    let shop = TestShop::open();
    let coupons = CouponManager::new(shop.state.shop());
    coupons.initialize_if_absent().unwrap();

    shop.state
        .shop()
        .save_collection::<shopkeep_core::Coupon>(Collection::Coupons, &[])
        .unwrap();

    let shop = shop.reopen();
    let coupons = CouponManager::new(shop.state.shop());
    assert!(!coupons.initialize_if_absent().unwrap());
    assert!(coupons.list().unwrap().is_empty());
}

#[test]
fn test_seed_eligibility_follows_dates() {
    let shop = TestShop::open();
    let coupons = CouponManager::new(shop.state.shop());
    coupons.initialize_if_absent().unwrap();
    let subtotal = Decimal::new(120, 0);

    let june = midnight(2025, 6, 1);
    assert!(matches!(
        coupons.find_eligible("frete15", subtotal, june).unwrap(),
        CouponMatch::Eligible(c) if c.code == "FRETE15"
    ));

    let august = midnight(2025, 8, 1);
    assert_eq!(
        coupons.find_eligible("FRETE15", subtotal, august).unwrap(),
        CouponMatch::NotEligible
    );
    assert!(matches!(
        coupons.find_eligible("DESCONTO10", subtotal, august).unwrap(),
        CouponMatch::Eligible(_)
    ));

    let next_year = midnight(2026, 1, 1);
    assert_eq!(
        coupons.find_eligible("DESCONTO10", subtotal, next_year).unwrap(),
        CouponMatch::NotEligible
    );
}

// ============================================================================
// Administration Tests
// ============================================================================

#[test]
fn test_toggle_and_minimum() {
    let shop = TestShop::open();
    let coupon = shop.add_coupon("verao", DiscountKind::Percentage, 15, 100);
    assert_eq!(coupon.code, "VERAO");

    let coupons = CouponManager::new(shop.state.shop());
    let now = Utc::now();
    assert_eq!(
        coupons
            .find_eligible("VERAO", Decimal::new(99, 0), now)
            .unwrap(),
        CouponMatch::NotEligible
    );
    assert!(matches!(
        coupons
            .find_eligible("VERAO", Decimal::ONE_HUNDRED, now)
            .unwrap(),
        CouponMatch::Eligible(_)
    ));

    assert_eq!(coupons.toggle_active(&coupon.id).unwrap(), Some(false));
    assert_eq!(
        coupons
            .find_eligible("VERAO", Decimal::ONE_HUNDRED, now)
            .unwrap(),
        CouponMatch::NotEligible
    );
    assert_eq!(coupons.toggle_active(&coupon.id).unwrap(), Some(true));
}
