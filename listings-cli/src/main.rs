//! listings CLI - run and administer the listings HTTP backend
//!
//! - `serve`: HTTP API over Postgres
//! - `migrate`: create or update the schema
//! - `user add`: register a buyer, realtor, or admin
//! - `token`: mint a bearer token for an existing user

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "listings",
    author,
    version,
    about = "Real-estate listings backend: homes, images, and buyer inquiries"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Run database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Manage users
    User(commands::user::UserArgs),
    /// Mint a bearer token for an existing user
    Token(commands::token::TokenArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; values may come from the real environment
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
        Commands::User(args) => commands::run_user(args).await?,
        Commands::Token(args) => commands::run_token(args).await?,
    }

    Ok(())
}
