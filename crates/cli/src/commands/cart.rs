//! Cart commands.
//!
//! Each invocation is one session: restore (or create) the persisted cart
//! through the storefront's proxy, apply the action, print the cart.

use std::path::PathBuf;

use clap::Subcommand;
use harbor_cart::{CartApi, CartClientError, CartHolder, FileCartIdStore};
use harbor_core::{Cart, CartLineId, VariantId};
use thiserror::Error;

#[derive(Subcommand)]
pub enum CartAction {
    /// Print the cart
    Show,
    /// Add a variant
    Add {
        /// Variant ID (gid://shopify/ProductVariant/...)
        variant: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Update {
        /// Line number as shown by `cart show`, or a cart line ID
        line: String,

        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Line number as shown by `cart show`, or a cart line ID
        line: String,
    },
    /// Print the checkout URL
    Checkout,
}

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("Invalid storefront URL: {0}")]
    Client(#[from] CartClientError),

    #[error("Could not load or create a cart at {0}; is the storefront running?")]
    Unavailable(String),

    #[error("No line {0} in the cart")]
    UnknownLine(String),

    #[error("Cart is empty, nothing to check out")]
    EmptyCart,

    #[error("Cart {0} failed; the cart was left unchanged")]
    NotApplied(&'static str),
}

/// Run one cart action.
#[allow(clippy::print_stdout)]
pub async fn run(
    base_url: &str,
    state_file: PathBuf,
    action: CartAction,
) -> Result<(), CartCommandError> {
    let holder = CartHolder::new(CartApi::new(base_url)?, FileCartIdStore::new(state_file));
    holder.init().await;

    let cart = holder
        .cart()
        .await
        .ok_or_else(|| CartCommandError::Unavailable(base_url.to_string()))?;

    let applied = match action {
        CartAction::Show => None,
        CartAction::Add { variant, quantity } => {
            holder
                .add_item(VariantId::new(variant), Some(quantity))
                .await;
            Some("add")
        }
        CartAction::Update { line, quantity } => {
            let line_id = resolve_line(&cart, &line)?;
            if cart.line(&line_id).is_some_and(|l| l.quantity == quantity) {
                None
            } else {
                holder.update_item(line_id, quantity).await;
                Some("update")
            }
        }
        CartAction::Remove { line } => {
            holder.remove_item(resolve_line(&cart, &line)?).await;
            Some("remove")
        }
        CartAction::Checkout => {
            if cart.is_empty() {
                return Err(CartCommandError::EmptyCart);
            }
            println!("{}", cart.checkout_url);
            return Ok(());
        }
    };

    let after = holder.cart().await;
    if let Some(action) = applied {
        check_applied(action, &cart, after.as_ref())?;
    }
    if let Some(after) = after {
        println!("{}", render_cart(&after));
    }
    Ok(())
}

/// The holder logs and swallows failed mutations, leaving the cart as it
/// was. Every mutation the CLI sends changes the cart when it succeeds.
fn check_applied(
    action: &'static str,
    before: &Cart,
    after: Option<&Cart>,
) -> Result<(), CartCommandError> {
    match after {
        Some(after) if after != before => Ok(()),
        _ => Err(CartCommandError::NotApplied(action)),
    }
}

/// Accept a 1-based line number or a literal line ID.
fn resolve_line(cart: &Cart, line: &str) -> Result<CartLineId, CartCommandError> {
    let found = match line.parse::<usize>() {
        Ok(n) => n.checked_sub(1).and_then(|i| cart.lines.get(i)),
        Err(_) => cart.line(&CartLineId::new(line)),
    };
    found
        .map(|l| l.id.clone())
        .ok_or_else(|| CartCommandError::UnknownLine(line.to_string()))
}

fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty.".to_string();
    }

    let mut out = String::new();
    for (i, line) in cart.lines.iter().enumerate() {
        let merchandise = &line.merchandise;
        let name = merchandise.variant_title().map_or_else(
            || merchandise.product.title.clone(),
            |variant| format!("{} - {variant}", merchandise.product.title),
        );
        out.push_str(&format!(
            "{:>3}. {name:<36} x{:<3} {}\n",
            i + 1,
            line.quantity,
            merchandise.price.format()
        ));
    }
    out.push_str(&format!(
        "     {} items, subtotal {}",
        cart.total_quantity,
        cart.cost.subtotal_amount.format()
    ));
    if let Some(tax) = &cart.cost.total_tax_amount {
        out.push_str(&format!(", tax {}", tax.format()));
    }
    out.push_str(&format!(", total {}", cart.cost.total_amount.format()));
    out
}
