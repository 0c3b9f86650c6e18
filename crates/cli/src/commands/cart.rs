//! Buyer commands: cart, checkout and postal-code lookup.

use shopkeep_admin::CatalogManager;
use shopkeep_core::pricing::{CouponMatch, FREE_SHIPPING_LABEL, OrderTotals, shipping_display_text};
use shopkeep_core::{Address, CustomerInfo, ProductId, VariationId, format_price};
use shopkeep_storefront::{AppState, Cart, Checkout, LookupOutcome};
use tracing::{info, warn};

use super::CommandError;

/// Buyer details from the command line.
pub struct CheckoutInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub zip: String,
    pub lookup: bool,
    pub street: Option<String>,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub coupon: Option<String>,
}

/// Show cart lines and totals.
///
/// # Errors
///
/// Returns an error if the cart cannot be read.
pub fn show(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let cart = Cart::restore(state.session())?;
    if cart.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }
    for line in cart.items() {
        info!(
            "{} x{} @ {} = {}",
            line.display_name(),
            line.quantity,
            format_price(line.price),
            format_price(line.line_total())
        );
    }
    let subtotal = cart.cart_total();
    let totals = OrderTotals::compute(subtotal, None);
    info!("Itens: {}", cart.cart_count());
    info!("Subtotal: {}", format_price(subtotal));
    info!("Frete: {}", shipping_display_text(subtotal));
    info!("Total: {}", format_price(totals.total));
    Ok(())
}

/// Add a product, or one of its variations, to the cart.
///
/// # Errors
///
/// Returns an error if the product or variation does not exist, the
/// variation is out of stock, or the cart cannot be saved.
pub fn add(
    state: &AppState,
    product: &str,
    variation: Option<&str>,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let variation = variation.map(VariationId::from);
    let line = CatalogManager::new(state.shop()).cart_line(
        &ProductId::new(product),
        variation.as_ref(),
        quantity,
    )?;
    let name = line.display_name();

    let mut cart = Cart::restore(state.session())?;
    cart.add_to_cart(line)?;
    info!("Added {name} (cart now has {} items)", cart.cart_count());
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be read or saved.
pub fn remove(
    state: &AppState,
    product: &str,
    variation: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let variation = variation.map(VariationId::from);
    let mut cart = Cart::restore(state.session())?;
    if cart.remove_from_cart(&ProductId::new(product), variation.as_ref())? {
        info!("Removed {product}");
    } else {
        info!("{product} is not in the cart");
    }
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns an error if the cart cannot be read or saved.
pub fn set_qty(
    state: &AppState,
    product: &str,
    variation: Option<&str>,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let variation = variation.map(VariationId::from);
    let mut cart = Cart::restore(state.session())?;
    cart.update_quantity(&ProductId::new(product), variation.as_ref(), quantity)?;
    info!("Cart now has {} items", cart.cart_count());
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the saved cart cannot be removed.
pub fn clear(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    Cart::restore(state.session())?.clear_cart()?;
    info!("Cart cleared");
    Ok(())
}

/// Look up an address by postal code.
///
/// # Errors
///
/// Returns an error if the code does not have eight digits.
pub async fn zip(state: &AppState, code: &str) -> Result<(), Box<dyn std::error::Error>> {
    match state.sequencer().run(state.lookup(), code).await? {
        LookupOutcome::Found(fragment) => {
            info!("{}", fragment.street);
            info!("{}", fragment.neighborhood);
            info!("{}/{}", fragment.city, fragment.state);
        }
        LookupOutcome::NotFound | LookupOutcome::Stale => {
            warn!("No address found for {code}");
        }
    }
    Ok(())
}

/// Place an order for the session cart.
///
/// # Errors
///
/// Returns an error if the coupon does not apply, the buyer details are
/// incomplete, the cart is empty, or the order cannot be saved.
pub async fn checkout(
    state: &AppState,
    input: CheckoutInput,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = Cart::restore(state.session())?;
    let mut checkout = Checkout::new(state.shop());

    let mut address = Address {
        zip_code: input.zip,
        number: input.number,
        complement: input.complement,
        ..Address::default()
    };
    if input.lookup {
        match state.sequencer().run(state.lookup(), &address.zip_code).await {
            Ok(LookupOutcome::Found(fragment)) => address.apply_lookup(fragment),
            Ok(LookupOutcome::NotFound | LookupOutcome::Stale) => {
                warn!("No address found for {}; fill it in by hand", address.zip_code);
            }
            Err(e) => warn!("Skipping address lookup: {e}"),
        }
    }
    let typed = [
        (&mut address.street, input.street),
        (&mut address.neighborhood, input.neighborhood),
        (&mut address.city, input.city),
        (&mut address.state, input.state),
    ];
    for (field, value) in typed {
        if let Some(value) = value {
            *field = value;
        }
    }

    checkout.customer = CustomerInfo {
        name: input.name,
        email: input.email,
        phone: input.phone,
        address,
    };

    if let Some(code) = input.coupon
        && checkout.apply_coupon(&code, cart.cart_total())? == CouponMatch::NotEligible
    {
        return Err(CommandError::CouponNotEligible(code).into());
    }

    let order = checkout.place_order(&mut cart)?;

    info!(order_id = %order.id, "Pedido #{} criado", order.id.short());
    info!("Subtotal: {}", format_price(order.subtotal));
    if order.shipping.is_zero() {
        info!("Frete: {FREE_SHIPPING_LABEL}");
    } else {
        info!("Frete: {}", format_price(order.shipping));
    }
    if let Some(code) = &order.coupon_code {
        info!("Desconto ({code}): -{}", format_price(order.discount));
    }
    info!("Total: {}", format_price(order.total));
    info!("Entrega: {}", order.customer_info.address.one_line());
    Ok(())
}
