//! Shopfront CLI - a terminal storefront for the hosted course API.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shopfront products
//! shopfront product -L9tH8jxVb2Ka_DYPwng
//!
//! # Cart
//! shopfront cart
//! shopfront cart add -L9tH8jxVb2Ka_DYPwng --qty 2
//! shopfront cart update -MaBcDeF --qty 3
//! shopfront cart remove -MaBcDeF
//! shopfront cart clear
//!
//! # Order
//! shopfront order --name 王小明 --email ming@example.com --tel 0912345678 --address 台北市
//! ```
//!
//! Configuration comes from the environment (see `shopfront::config`).
//! Logs go to stderr; set `RUST_LOG` to adjust and
//! `SHOPFRONT_LOG_FORMAT=json` for JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Terminal storefront for the hosted shop API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    Products,
    /// Show one product's details
    Product {
        /// Product id
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Place an order for the current cart
    Order {
        /// Recipient name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Phone number (8-10 characters)
        #[arg(long)]
        tel: String,
        /// Delivery address
        #[arg(long)]
        address: String,
        /// Note for the shop
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product id
        #[arg(allow_hyphen_values = true)]
        product_id: String,
        /// Quantity (default 1)
        #[arg(short, long)]
        qty: Option<u32>,
    },
    /// Change a cart line's quantity
    Update {
        /// Cart item id
        #[arg(allow_hyphen_values = true)]
        item_id: String,
        /// New quantity
        #[arg(short, long)]
        qty: u32,
    },
    /// Remove a cart line
    Remove {
        /// Cart item id
        #[arg(allow_hyphen_values = true)]
        item_id: String,
    },
    /// Remove every cart line
    Clear,
}

fn init_tracing() {
    // Quiet by default so command output stays readable
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=warn,shopfront_cli=info".into());

    let json = std::env::var("SHOPFRONT_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        render::failure(&e);
        tracing::debug!(error = ?e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Products => commands::catalog::list(&ctx).await?,
        Commands::Product { id } => commands::catalog::show(&ctx, &id).await?,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(&ctx).await?,
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&ctx, &product_id, qty).await?;
            }
            CartAction::Update { item_id, qty } => {
                commands::cart::update(&ctx, &item_id, qty).await?;
            }
            CartAction::Remove { item_id } => commands::cart::remove(&ctx, &item_id).await?,
            CartAction::Clear => commands::cart::clear(&ctx).await?,
        },
        Commands::Order {
            name,
            email,
            tel,
            address,
            message,
        } => {
            let details = commands::order::OrderDetails {
                name,
                email,
                tel,
                address,
                message,
            };
            commands::order::place(&ctx, details).await?;
        }
    }
    Ok(())
}
