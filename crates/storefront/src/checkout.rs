//! Checkout: coupon entry, order summary and order placement.
//!
//! A [`Checkout`] holds what the buyer has typed so far (customer details and
//! the applied coupon) for one session. Placing the order validates that
//! input, prices the cart, appends the order to the shop's order collection
//! and empties the cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopkeep_core::pricing::{CouponMatch, OrderTotals, find_eligible_coupon};
use shopkeep_core::{
    Collection, Coupon, CustomerInfo, Email, KeyValueStore, Order, OrderId, OrderStatus,
    PersistenceGateway, ValidationError, error::require,
};
use tracing::instrument;

use crate::cart::Cart;
use crate::error::{AppError, Result};

/// One buyer's checkout in progress.
#[derive(Debug)]
pub struct Checkout<'a, P> {
    shop: &'a PersistenceGateway<P>,
    applied_coupon: Option<Coupon>,
    /// Details typed into the checkout form.
    pub customer: CustomerInfo,
}

impl<'a, P: KeyValueStore> Checkout<'a, P> {
    /// Start a checkout against the shop's collections.
    #[must_use]
    pub fn new(shop: &'a PersistenceGateway<P>) -> Self {
        Self {
            shop,
            applied_coupon: None,
            customer: CustomerInfo::default(),
        }
    }

    /// The coupon currently applied, if any.
    #[must_use]
    pub const fn applied_coupon(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    /// Apply a typed coupon code to a cart with the given subtotal.
    ///
    /// An eligible coupon replaces the applied one. A code that does not
    /// match keeps whatever was applied before.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the coupon collection cannot be read.
    pub fn apply_coupon(&mut self, code: &str, subtotal: Decimal) -> Result<CouponMatch> {
        let coupons: Vec<Coupon> = self.shop.load_collection(Collection::Coupons)?;
        let found = find_eligible_coupon(&coupons, code, subtotal, Utc::now());
        match &found {
            CouponMatch::Eligible(coupon) => {
                tracing::info!(code = %coupon.code, "Coupon applied");
                self.applied_coupon = Some(coupon.clone());
            }
            CouponMatch::NotEligible => {
                tracing::debug!(code = %code, "Coupon code not eligible");
            }
        }
        Ok(found)
    }

    /// Drop the applied coupon.
    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
    }

    /// Summary figures for the cart as it stands.
    #[must_use]
    pub fn totals<S: KeyValueStore>(&self, cart: &Cart<S>) -> OrderTotals {
        OrderTotals::compute(cart.cart_total(), self.applied_coupon.as_ref())
    }

    /// Place the order for `cart` with the details in `self.customer`.
    ///
    /// On success the cart is emptied and the form and applied coupon are
    /// reset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the cart is empty or the customer
    /// details are incomplete, or `AppError::Store` if the order cannot be
    /// saved. Nothing changes on error.
    pub fn place_order<S: KeyValueStore>(&mut self, cart: &mut Cart<S>) -> Result<Order> {
        let order = create_order(
            self.shop,
            cart,
            &self.customer,
            self.applied_coupon.as_ref(),
            Utc::now(),
        )?;
        self.applied_coupon = None;
        self.customer = CustomerInfo::default();
        Ok(order)
    }
}

/// Create and store an order from the cart, then clear the cart.
///
/// The coupon is applied as given; eligibility was decided when it was
/// applied.
///
/// # Errors
///
/// Returns `AppError::Validation` if the cart is empty or the customer
/// details are incomplete, or `AppError::Store` if the order cannot be saved.
#[instrument(skip_all, fields(lines = cart.items().len(), coupon = ?applied_coupon.map(|c| &c.code)))]
pub fn create_order<P: KeyValueStore, S: KeyValueStore>(
    shop: &PersistenceGateway<P>,
    cart: &mut Cart<S>,
    customer_info: &CustomerInfo,
    applied_coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<Order> {
    validate_checkout(cart, customer_info)?;

    let totals = OrderTotals::compute(cart.cart_total(), applied_coupon);
    let order = shop.update_collection(Collection::Orders, |orders: &mut Vec<Order>| {
        let order = Order {
            id: next_order_id(orders, now),
            items: cart.items().to_vec(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            discount: totals.discount,
            total: totals.total,
            coupon_code: applied_coupon.map(|c| c.code.clone()),
            customer_info: customer_info.clone(),
            status: OrderStatus::Pending,
            created_at: now,
        };
        orders.push(order.clone());
        Ok::<_, AppError>(order)
    })?;

    tracing::info!(
        order_id = %order.id,
        total = %order.total,
        "Order placed"
    );

    if let Err(e) = cart.clear_cart() {
        tracing::warn!(order_id = %order.id, error = %e, "Order placed but cart could not be cleared");
    }

    Ok(order)
}

/// Check that an order can be placed for this cart and customer.
fn validate_checkout<S: KeyValueStore>(
    cart: &Cart<S>,
    customer: &CustomerInfo,
) -> std::result::Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    require(&customer.name, "name")?;
    require(&customer.email, "email")?;
    require(&customer.address.zip_code, "zipCode")?;
    Email::parse(&customer.email)?;
    Ok(())
}

/// Millisecond-stamped ID for an order placed at `now`, bumped past any
/// stamp already taken.
fn next_order_id(existing: &[Order], now: DateTime<Utc>) -> OrderId {
    let mut millis = now.timestamp_millis();
    while existing.iter().any(|o| o.id.millis() == Some(millis)) {
        millis += 1;
    }
    OrderId::from_millis(millis)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use shopkeep_core::{Address, CartItem, CouponId, DiscountKind, MemoryStore, ProductId};

    use super::*;

    fn item(product: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            variation_id: None,
            product_name: product.to_string(),
            variation_name: None,
            price: Decimal::new(price, 0),
            quantity,
        }
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: String::new(),
            address: Address {
                zip_code: "01310-100".to_string(),
                ..Address::default()
            },
        }
    }

    fn coupon(code: &str, kind: DiscountKind, discount: i64, min: i64) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: CouponId::new(code),
            code: code.to_string(),
            discount: Decimal::new(discount, 0),
            discount_type: kind,
            min_value: Decimal::new(min, 0),
            valid_until: now + Duration::days(30),
            is_active: true,
            created_at: now,
        }
    }

    fn orders(shop: &PersistenceGateway<MemoryStore>) -> Vec<Order> {
        shop.load_collection(Collection::Orders).unwrap()
    }

    #[test]
    fn test_place_order_with_percentage_coupon() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        shop.save_collection(
            Collection::Coupons,
            &[coupon("DESCONTO10", DiscountKind::Percentage, 10, 50)],
        )
        .unwrap();
        let session = MemoryStore::new();
        let mut cart = Cart::restore(&session).unwrap();
        cart.add_to_cart(item("p1", 50, 2)).unwrap();

        let mut checkout = Checkout::new(&shop);
        checkout.customer = customer();
        let found = checkout.apply_coupon("desconto10", cart.cart_total()).unwrap();
        assert!(matches!(found, CouponMatch::Eligible(_)));

        let totals = checkout.totals(&cart);
        assert_eq!(totals.total, Decimal::new(105, 0));

        let order = checkout.place_order(&mut cart).unwrap();
        assert_eq!(order.subtotal, Decimal::new(100, 0));
        assert_eq!(order.shipping, Decimal::new(15, 0));
        assert_eq!(order.discount, Decimal::new(10, 0));
        assert_eq!(order.total, Decimal::new(105, 0));
        assert_eq!(order.coupon_code.as_deref(), Some("DESCONTO10"));
        assert_eq!(order.status, OrderStatus::Pending);

        assert!(cart.is_empty());
        assert!(!session.contains("cart").unwrap());
        assert!(checkout.applied_coupon().is_none());
        assert!(checkout.customer.name.is_empty());
        assert_eq!(orders(&shop), vec![order]);
    }

    #[test]
    fn test_unknown_coupon_keeps_previous() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        shop.save_collection(
            Collection::Coupons,
            &[coupon("FRETE15", DiscountKind::Fixed, 15, 100)],
        )
        .unwrap();

        let mut checkout = Checkout::new(&shop);
        checkout.apply_coupon("FRETE15", Decimal::new(150, 0)).unwrap();
        let found = checkout.apply_coupon("NOPE", Decimal::new(150, 0)).unwrap();

        assert_eq!(found, CouponMatch::NotEligible);
        assert_eq!(checkout.applied_coupon().map(|c| c.code.as_str()), Some("FRETE15"));

        checkout.remove_coupon();
        assert!(checkout.applied_coupon().is_none());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        let session = MemoryStore::new();
        let mut cart = Cart::restore(&session).unwrap();
        let mut checkout = Checkout::new(&shop);
        checkout.customer = customer();

        let err = checkout.place_order(&mut cart).unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::EmptyCart)));
        assert!(!shop.has_collection(Collection::Orders).unwrap());
    }

    #[test]
    fn test_missing_fields_change_nothing() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        let session = MemoryStore::new();
        let mut cart = Cart::restore(&session).unwrap();
        cart.add_to_cart(item("p1", 30, 1)).unwrap();

        let cases: [(fn(&mut CustomerInfo), &str); 3] = [
            (|c| c.name.clear(), "name"),
            (|c| c.email = "  ".to_string(), "email"),
            (|c| c.address.zip_code.clear(), "zipCode"),
        ];
        for (blank, field) in cases {
            let mut info = customer();
            blank(&mut info);
            let err = create_order(&shop, &mut cart, &info, None, Utc::now()).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ValidationError::MissingField(f)) if f == field),
                "field {field}"
            );
        }

        assert_eq!(cart.cart_count(), 1);
        assert!(orders(&shop).is_empty());
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        let session = MemoryStore::new();
        let mut cart = Cart::restore(&session).unwrap();
        cart.add_to_cart(item("p1", 30, 1)).unwrap();
        let mut info = customer();
        info.email = "ana.example.com".to_string();

        let err = create_order(&shop, &mut cart, &info, None, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidEmail(_))
        ));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_same_millisecond_orders_get_distinct_ids() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        let session = MemoryStore::new();
        let now = Utc::now();

        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut cart = Cart::restore(&session).unwrap();
            cart.add_to_cart(item("p1", 10, 1)).unwrap();
            let order = create_order(&shop, &mut cart, &customer(), None, now).unwrap();
            ids.push(order.id);
        }

        let base = now.timestamp_millis();
        assert_eq!(
            ids,
            vec![
                OrderId::from_millis(base),
                OrderId::from_millis(base + 1),
                OrderId::from_millis(base + 2),
            ]
        );
        assert_eq!(orders(&shop).len(), 3);
    }

    #[test]
    fn test_fixed_coupon_can_make_total_negative() {
        let shop = PersistenceGateway::new(MemoryStore::new());
        let session = MemoryStore::new();
        let mut cart = Cart::restore(&session).unwrap();
        cart.add_to_cart(item("p1", 5, 1)).unwrap();
        let big = coupon("BIG", DiscountKind::Fixed, 100, 0);

        let order = create_order(&shop, &mut cart, &customer(), Some(&big), Utc::now()).unwrap();
        assert_eq!(order.shipping, Decimal::new(20, 0));
        assert_eq!(order.total, Decimal::new(-75, 0));
    }
}
