//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! gm-cart list [--json]
//! gm-cart add --id p1 --title Shirt --image-url https://cdn.example/p1.png --price 10
//! gm-cart increment p1
//! gm-cart decrement p1
//! gm-cart seed fixtures/cart.yaml
//! ```

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Subcommand;
use gomarketplace_cart::{CartConfig, CartHandle, CartProvider};
use gomarketplace_core::{Cart, Product, ProductId, UnitPrice};

use super::seed;

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart
    List {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Put one unit of a product in the cart
    Add {
        /// Product identifier
        #[arg(long)]
        id: ProductId,

        /// Display name
        #[arg(long)]
        title: String,

        /// Display image URL
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.90)
        #[arg(long)]
        price: UnitPrice,
    },
    /// Add one unit to a product already in the cart
    Increment {
        /// Product identifier
        id: ProductId,
    },
    /// Remove one unit from a product in the cart
    Decrement {
        /// Product identifier
        id: ProductId,
    },
    /// Add every product listed in a YAML file
    Seed {
        /// Path to the YAML product list
        file: PathBuf,
    },
}

/// Mount the configured cart, run `command` against it, then unmount.
///
/// # Errors
///
/// Returns an error if the cart cannot be mounted, the command fails, or the
/// final flush fails.
pub async fn run(config: &CartConfig, command: CartCommand) -> Result<(), Box<dyn std::error::Error>> {
    let provider = CartProvider::from_config(config).await?;
    let cart = provider.handle();

    let result = execute(&cart, command).await;

    // Unmount even if the command failed so write-behind changes are flushed
    provider.unmount().await?;
    result
}

async fn execute(cart: &CartHandle, command: CartCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        CartCommand::List { json } => {
            let snapshot = cart.products()?;
            let output = if json {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                render(&snapshot)
            };
            print_output(&output);
        }
        CartCommand::Add {
            id,
            title,
            image_url,
            price,
        } => {
            cart.add(Product {
                id: id.clone(),
                title,
                image_url,
                price,
            })
            .await?;
            log_quantity(cart, &id)?;
        }
        CartCommand::Increment { id } => {
            if cart.increment(&id).await? {
                log_quantity(cart, &id)?;
            } else {
                tracing::warn!(product_id = %id, "Product not in cart, nothing changed");
            }
        }
        CartCommand::Decrement { id } => {
            if cart.decrement(&id).await? {
                log_quantity(cart, &id)?;
            } else {
                tracing::warn!(product_id = %id, "Product not in cart, nothing changed");
            }
        }
        CartCommand::Seed { file } => {
            let added = seed::from_file(cart, &file).await?;
            tracing::info!(added, path = %file.display(), "Seeded cart");
        }
    }
    Ok(())
}

fn log_quantity(cart: &CartHandle, id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = cart.products()?;
    if let Some(line) = snapshot.get(id) {
        tracing::info!(
            product_id = %id,
            quantity = line.quantity,
            cart_items = snapshot.item_count(),
            "Cart updated"
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let id_width = cart
        .items()
        .iter()
        .map(|line| line.id.as_str().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let title_width = cart
        .items()
        .iter()
        .map(|line| line.title.len())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<title_width$}  {:>8}  {:>10}",
        "ID", "TITLE", "QTY", "PRICE"
    );
    for line in cart {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<title_width$}  {:>8}  {:>10}",
            line.id.as_str(),
            line.title,
            line.quantity,
            line.price.to_string()
        );
    }
    let _ = write!(out, "{} line(s), {} item(s)", cart.len(), cart.item_count());
    out
}
