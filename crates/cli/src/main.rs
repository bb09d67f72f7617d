//! Extended Products CLI - Database migrations and product tools.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! ep-cli migrate
//!
//! # Upsert products from a YAML file
//! ep-cli seed crates/cli/data/sample_products.yaml
//!
//! # Print the decoded extended attributes of a product
//! ep-cli show prod_pistachio
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Upsert products from YAML
//! - `show` - Decode and print a product's extended attributes

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ep-cli")]
#[command(author, version, about = "Extended products CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Upsert products from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,
    },
    /// Print a product's decoded extended attributes as JSON
    Show {
        /// Product ID
        product_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Seed { file } => commands::seed::products(&file).await?,
        Commands::Show { product_id } => commands::show::product(&product_id).await?,
    }
    Ok(())
}
