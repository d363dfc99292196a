//! GoMarketplace CLI - Cart inspection and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart list
//!
//! # Put one unit of a product in the cart
//! gm-cart add --id p1 --title Shirt --image-url https://cdn.example/p1.png --price 10
//!
//! # Change quantities
//! gm-cart increment p1
//! gm-cart decrement p1
//!
//! # Add every product listed in a YAML file
//! gm-cart seed fixtures/cart.yaml
//!
//! # Create the PostgreSQL storage table
//! gm-cart migrate
//! ```
//!
//! Storage is selected through the `CART_*` environment variables, see
//! `gomarketplace_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use gomarketplace_cart::CartConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::cart::CartCommand;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Emit logs as JSON lines instead of text
    #[arg(long, global = true, env = "CART_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Cart(CartCommand),
    /// Run cart storage migrations
    #[cfg(feature = "postgres")]
    Migrate,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarketplace_cart=info,gm_cart=info".into());

    let cli = Cli::parse();

    // Logs go to stderr so `list --json` output stays pipeable
    let json_layer = cli.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    tracing::debug!(?config, "Loaded cart configuration");

    match cli.command {
        Commands::Cart(command) => commands::cart::run(&config, command).await?,
        #[cfg(feature = "postgres")]
        Commands::Migrate => commands::migrate::run(&config).await?,
    }
    Ok(())
}
