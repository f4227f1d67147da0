//! HTTP server command
//!
//! Runs the listings API over a Postgres-backed store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use listings_server::db::{migrations, PgHomeStore};
use listings_server::{run_server, AppState, ServerConfig};

use super::{DatabaseArgs, TokenKeyArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "LISTINGS_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Do not run migrations before serving
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub tokens: TokenKeyArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let tokens = args.tokens.keys()?;
    let pool = args.database.connect().await?;

    if args.skip_migrations {
        tracing::warn!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    tracing::info!("Starting listings server on {}", args.bind);

    let state = AppState::new(Arc::new(PgHomeStore::new(pool)), tokens);
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
