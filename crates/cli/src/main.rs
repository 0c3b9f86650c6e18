//! Shopkeep CLI - storefront and back office from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Catalog
//! shopkeep product add -n "Camiseta" -p 49.90 -v "P:0:10" -v "G:54.90:3"
//! shopkeep product list
//!
//! # Buyer flow
//! shopkeep cart add <product-id> --variation <variation-id> --qty 2
//! shopkeep checkout -n "Ana" -e ana@example.com -z 01310-100 --lookup --coupon DESCONTO10
//!
//! # Back office
//! shopkeep order advance <order-id>
//! shopkeep dashboard
//! ```
//!
//! # Commands
//!
//! - `init` - Write the default coupons if the shop has none
//! - `product` - List, add or delete products
//! - `coupon` - List, add or toggle coupons
//! - `cart` - Show or change the session cart
//! - `checkout` - Place an order for the session cart
//! - `order` - List, show or change orders
//! - `stock` - List or set stock records
//! - `zip` - Look up an address by postal code
//! - `dashboard` - Shop summary
//!
//! Data lives under `SHOPKEEP_DATA_DIR`; see `shopkeep_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use shopkeep_admin::CouponManager;
use shopkeep_core::{DiscountKind, OrderStatus};
use shopkeep_storefront::{AppState, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "shopkeep")]
#[command(author, version, about = "Shopkeep storefront and back office")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default coupons if the shop has none
    Init,
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage coupons
    Coupon {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Show or change the session cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the session cart
    Checkout(CheckoutArgs),
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage stock records
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Look up an address by postal code
    Zip {
        /// Postal code, with or without punctuation
        code: String,
    },
    /// Show shop summary figures
    Dashboard,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products and their variations
    List,
    /// Add a product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Base price
        #[arg(short, long)]
        price: Decimal,

        /// Variation as `NAME:PRICE:STOCK` (repeatable; price 0 uses the base price)
        #[arg(short, long = "variation", value_parser = commands::catalog::parse_variation)]
        variations: Vec<shopkeep_admin::VariationRow>,
    },
    /// Delete a product and its variations
    Delete {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CouponAction {
    /// List coupons
    List,
    /// Add a coupon
    Add {
        /// Coupon code (stored upper-case)
        #[arg(short, long)]
        code: String,

        /// Discount amount or percentage
        #[arg(short, long)]
        discount: Decimal,

        /// Discount type (`percentage` or `fixed`)
        #[arg(short, long, default_value = "percentage")]
        kind: DiscountKind,

        /// Minimum subtotal
        #[arg(short, long, default_value = "0")]
        min: Decimal,

        /// Expiry date (`YYYY-MM-DD`)
        #[arg(short, long)]
        valid_until: String,

        /// Create the coupon inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Switch a coupon between active and inactive
    Toggle {
        /// Coupon ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product: String,

        /// Variation ID
        #[arg(short, long)]
        variation: Option<String>,

        /// Quantity
        #[arg(short, long, default_value = "1")]
        qty: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Product ID
        product: String,

        /// Variation ID
        #[arg(short, long)]
        variation: Option<String>,
    },
    /// Set a line's quantity (0 or less removes it)
    SetQty {
        /// Product ID
        product: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        qty: i64,

        /// Variation ID
        #[arg(short, long)]
        variation: Option<String>,
    },
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct CheckoutArgs {
    /// Customer name
    #[arg(short, long)]
    name: String,

    /// Customer email
    #[arg(short, long)]
    email: String,

    /// Customer phone
    #[arg(long, default_value = "")]
    phone: String,

    /// Postal code
    #[arg(short, long)]
    zip: String,

    /// Fill street, neighborhood, city and state from the postal code
    #[arg(long)]
    lookup: bool,

    #[arg(long)]
    street: Option<String>,

    #[arg(long, default_value = "")]
    number: String,

    #[arg(long)]
    complement: Option<String>,

    #[arg(long)]
    neighborhood: Option<String>,

    #[arg(long)]
    city: Option<String>,

    /// Two-letter state code
    #[arg(long)]
    state: Option<String>,

    /// Coupon code to apply
    #[arg(short, long)]
    coupon: Option<String>,
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, newest first
    List,
    /// Show one order
    Show {
        /// Order ID
        id: String,
    },
    /// Set an order's status (`cancelled` deletes the order)
    Status {
        /// Order ID
        id: String,

        /// New status
        status: OrderStatus,
    },
    /// Move an order to its next status
    Advance {
        /// Order ID
        id: String,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// List stock records
    List {
        /// Only records at or below their minimum
        #[arg(long)]
        low: bool,
    },
    /// Set the stock record for a product or variation
    Set {
        /// Product ID
        product: String,

        /// Variation ID
        #[arg(short, long)]
        variation: Option<String>,

        /// Units on hand
        #[arg(short, long)]
        quantity: u32,

        /// Reorder threshold
        #[arg(short, long, default_value = "0")]
        min: u32,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopkeep=info,shopkeep_storefront=info,shopkeep_admin=info".into());
    let json = cli.log_json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer().without_time().with_target(false)))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    let seeded = CouponManager::new(state.shop()).initialize_if_absent()?;

    match cli.command {
        Commands::Init => commands::coupons::init(seeded),
        Commands::Product { action } => match action {
            ProductAction::List => commands::catalog::list(&state)?,
            ProductAction::Add {
                name,
                price,
                variations,
            } => commands::catalog::add(&state, name, price, variations)?,
            ProductAction::Delete { id } => commands::catalog::delete(&state, &id)?,
        },
        Commands::Coupon { action } => match action {
            CouponAction::List => commands::coupons::list(&state)?,
            CouponAction::Add {
                code,
                discount,
                kind,
                min,
                valid_until,
                inactive,
            } => commands::coupons::add(
                &state,
                commands::coupons::NewCoupon {
                    code,
                    discount,
                    kind,
                    min,
                    valid_until,
                    active: !inactive,
                },
            )?,
            CouponAction::Toggle { id } => commands::coupons::toggle(&state, &id)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state)?,
            CartAction::Add {
                product,
                variation,
                qty,
            } => commands::cart::add(&state, &product, variation.as_deref(), qty)?,
            CartAction::Remove { product, variation } => {
                commands::cart::remove(&state, &product, variation.as_deref())?;
            }
            CartAction::SetQty {
                product,
                qty,
                variation,
            } => commands::cart::set_qty(&state, &product, variation.as_deref(), qty)?,
            CartAction::Clear => commands::cart::clear(&state)?,
        },
        Commands::Checkout(args) => commands::cart::checkout(&state, args.into()).await?,
        Commands::Order { action } => match action {
            OrderAction::List => commands::orders::list(&state)?,
            OrderAction::Show { id } => commands::orders::show(&state, &id)?,
            OrderAction::Status { id, status } => commands::orders::status(&state, &id, status)?,
            OrderAction::Advance { id } => commands::orders::advance(&state, &id)?,
        },
        Commands::Stock { action } => match action {
            StockAction::List { low } => commands::catalog::stock_list(&state, low)?,
            StockAction::Set {
                product,
                variation,
                quantity,
                min,
            } => commands::catalog::stock_set(&state, product, variation, quantity, min)?,
        },
        Commands::Zip { code } => commands::cart::zip(&state, &code).await?,
        Commands::Dashboard => commands::orders::dashboard(&state)?,
    }
    Ok(())
}

impl From<CheckoutArgs> for commands::cart::CheckoutInput {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            zip: args.zip,
            lookup: args.lookup,
            street: args.street,
            number: args.number,
            complement: args.complement,
            neighborhood: args.neighborhood,
            city: args.city,
            state: args.state,
            coupon: args.coupon,
        }
    }
}
