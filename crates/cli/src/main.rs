//! estore CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! estore-cli migrate
//!
//! # Load the sample catalog, or products from a JSON file
//! estore-cli seed products
//! estore-cli seed products --file catalog.json
//!
//! # Create a shopper account
//! estore-cli user create -n "Ada Lovelace" -e ada@example.com -p 'correct horse'
//! ```
//!
//! All commands read `ESTORE_DATABASE_URL` (or `DATABASE_URL`), loading `.env`
//! if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "estore-cli")]
#[command(author, version, about = "estore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert seed data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage shopper accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products into the catalog
    Products {
        /// JSON array of `{name, category, price, image}`; the built-in
        /// sample catalog is used when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new shopper account
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (used to log in)
        #[arg(short, long)]
        email: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(file.as_deref()).await?,
        },
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
            } => commands::user::create(&name, &email, &password).await?,
        },
    }
    Ok(())
}
