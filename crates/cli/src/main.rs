//! Harbor CLI - browse the catalog and drive a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Catalog, straight from the Storefront API (needs SHOPIFY_* variables)
//! harbor products --first 5
//! harbor product classic-tee
//! harbor collections
//! harbor collection summer
//!
//! # Cart, through a running storefront's /api/cart proxy
//! harbor cart add gid://shopify/ProductVariant/42 -q 2
//! harbor cart update 1 3
//! harbor cart remove 1
//! harbor cart show
//! harbor cart checkout
//! ```
//!
//! # Commands
//!
//! - `products`, `product`, `collections`, `collection` - Read the catalog
//! - `cart` - Show, edit, and check out the persisted session cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::cart::CartAction;

#[derive(Parser)]
#[command(name = "harbor")]
#[command(author, version, about = "Harbor storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the newest products
    Products {
        /// How many products to list (1-250)
        #[arg(short, long, default_value_t = 20)]
        first: u32,
    },
    /// Show one product with its variants
    Product {
        /// Product handle
        handle: String,
    },
    /// List collections
    Collections,
    /// Show one collection with its products
    Collection {
        /// Collection handle
        handle: String,
    },
    /// Work with the session cart
    Cart {
        /// Storefront base URL
        #[arg(
            long,
            env = "HARBOR_BASE_URL",
            default_value = "http://127.0.0.1:3000",
            global = true
        )]
        base_url: String,

        /// File the cart ID is persisted in
        #[arg(
            long,
            env = "HARBOR_CART_FILE",
            default_value = ".harbor/cart.json",
            global = true
        )]
        state_file: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env-backed arguments
    let _ = dotenvy::dotenv();

    // Library logs go to stderr; warn and above unless RUST_LOG says otherwise
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { first } => commands::catalog::products(first).await?,
        Commands::Product { handle } => commands::catalog::product(&handle).await?,
        Commands::Collections => commands::catalog::collections().await?,
        Commands::Collection { handle } => commands::catalog::collection(&handle).await?,
        Commands::Cart {
            base_url,
            state_file,
            action,
        } => commands::cart::run(&base_url, state_file, action).await?,
    }
    Ok(())
}
