//! Wishlist Proxy CLI - Database migrations and request signing tools.
//!
//! # Usage
//!
//! ```bash
//! # Run wishlist database migrations
//! wp-cli migrate
//!
//! # Print a signed App Proxy query string for manual testing
//! wp-cli sign --shop a.myshopify.com --customer 7 --param product_id=123
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `sign` - Sign a query string with the App Proxy shared secret

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use wishlist_proxy_core::SignatureMode;

mod commands;

#[derive(Parser)]
#[command(name = "wp-cli")]
#[command(author, version, about = "Wishlist Proxy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Print a signed App Proxy query string
    Sign {
        /// Shop domain (e.g. a.myshopify.com)
        #[arg(short, long)]
        shop: String,

        /// Logged-in customer id; omit to sign an anonymous visit
        #[arg(short, long)]
        customer: Option<String>,

        /// Extra parameter as key=value (repeatable)
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Signature scheme (`sha256` or `md5`)
        #[arg(short, long, default_value = "sha256")]
        mode: SignatureMode,

        /// Shared secret
        #[arg(long, env = "SHOPIFY_API_SECRET", hide_env_values = true)]
        secret: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Sign {
            shop,
            customer,
            params,
            mode,
            secret,
        } => {
            let query = commands::sign::signed_query(commands::sign::SignRequest {
                secret: SecretString::from(secret),
                mode,
                shop,
                customer,
                params,
            })?;

            #[allow(clippy::print_stdout)]
            {
                println!("{query}");
            }
        }
    }
    Ok(())
}
