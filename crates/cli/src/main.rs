//! Mobistore CLI - Drive the cart store from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add two units of a product
//! mobistore add --id 42 --name "Galaxy S24" --price 799.00 -q 2
//!
//! # Add a product exactly as the catalog API returned it
//! mobistore add --product-json '{"id": 42, "name": "Galaxy S24", "price": "799.00"}'
//!
//! # Change or remove a line
//! mobistore update 42 5
//! mobistore remove 42
//!
//! # Inspect the stored record
//! mobistore inspect
//!
//! # Print the order payload, then place it and clear the cart
//! mobistore checkout
//! mobistore checkout --confirm
//! ```
//!
//! # Commands
//!
//! - `show` - List line items and totals
//! - `add` / `update` / `remove` / `clear` - Cart mutations
//! - `inspect` - Stored record version, timestamp and dropped entries
//! - `checkout` - Build the order submission payload

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use mobistore_core::CatalogProduct;
use mobistore_storefront::{LogFormat, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mobistore")]
#[command(author, version, about = "Mobistore cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List line items and totals
    Show {
        /// Print the items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        #[command(flatten)]
        product: ProductArgs,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Overwrite the quantity of a line (0 or less removes it)
    Update {
        /// Product identifier
        id: String,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product identifier
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Show the stored record's version and timestamp
    Inspect,
    /// Build the order submission payload
    Checkout {
        /// Treat the submission as successful and clear the cart
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Args)]
struct ProductArgs {
    /// Product identifier
    #[arg(long, required_unless_present = "product_json")]
    id: Option<String>,

    /// Display name
    #[arg(long)]
    name: Option<String>,

    /// Brand
    #[arg(long)]
    brand: Option<String>,

    /// Unit price (e.g. 29.99)
    #[arg(long)]
    price: Option<String>,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    /// Full catalog product as JSON (overrides the other product flags)
    #[arg(long, conflicts_with = "id")]
    product_json: Option<String>,
}

impl ProductArgs {
    fn into_product(self) -> Result<CatalogProduct, commands::cart::CartCommandError> {
        if let Some(json) = self.product_json {
            return commands::cart::parse_product(&json);
        }
        Ok(CatalogProduct {
            id: self.id.map(Into::into),
            name: self.name,
            brand: self.brand,
            price: self.price.map(Into::into),
            image: self.image,
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so stdout stays
/// free for command output.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mobistore_cli=info,mobistore_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { json } => commands::cart::show(config, json)?,
        Commands::Add { product, quantity } => {
            commands::cart::add(config, &product.into_product()?, quantity)?;
        }
        Commands::Update { id, quantity } => commands::cart::update(config, &id, quantity),
        Commands::Remove { id } => commands::cart::remove(config, &id),
        Commands::Clear => commands::cart::clear(config),
        Commands::Inspect => commands::cart::inspect(config)?,
        Commands::Checkout { confirm } => commands::cart::checkout(config, confirm)?,
    }
    Ok(())
}
