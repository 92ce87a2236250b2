//! Shopyard CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! shopyard migrate
//!
//! # Create a superuser seller
//! shopyard superuser create -e ops@example.com -n "Ops" -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `superuser create` - Create a superuser seller account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopyard")]
#[command(author, version, about = "Shopyard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage superuser sellers
    Superuser {
        #[command(subcommand)]
        action: SuperuserAction,
    },
}

#[derive(Subcommand)]
enum SuperuserAction {
    /// Create a new superuser seller
    Create {
        /// Seller email address
        #[arg(short, long)]
        email: String,

        /// Seller display name
        #[arg(short, long)]
        name: String,

        /// Seller password (min 8 characters)
        #[arg(short, long)]
        password: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Superuser { action } => match action {
            SuperuserAction::Create {
                email,
                name,
                password,
            } => {
                commands::superuser::create(&email, &name, &password).await?;
            }
        },
    }
    Ok(())
}
