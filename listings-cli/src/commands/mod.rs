//! Subcommand implementations

pub mod migrate;
pub mod serve;
pub mod token;
pub mod user;

pub use migrate::run_migrate;
pub use serve::run_serve;
pub use token::run_token;
pub use user::run_user;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Args;
use listings_server::db::{create_pool_with_options, pool::DEFAULT_MAX_CONNECTIONS};
use listings_server::auth::{DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS};
use listings_server::TokenKeys;
use sqlx::PgPool;

/// Database connection options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "LISTINGS_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub async fn connect(&self) -> Result<PgPool> {
        let database_url = self
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        create_pool_with_options(database_url, self.max_connections)
            .await
            .context("Failed to create database pool")
    }
}

/// Token signing options
#[derive(Args, Debug, Clone)]
pub struct TokenKeyArgs {
    /// HMAC secret used to sign and verify bearer tokens
    #[arg(long, env = "JSON_TOKEN_KEY", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Lifetime of minted tokens in hours
    #[arg(
        long,
        env = "LISTINGS_TOKEN_TTL_HOURS",
        default_value_t = DEFAULT_TOKEN_TTL_HOURS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_HOURS)
    )]
    pub token_ttl_hours: i64,
}

impl TokenKeyArgs {
    pub fn keys(&self) -> Result<TokenKeys> {
        let secret = self
            .jwt_secret
            .as_deref()
            .context("JSON_TOKEN_KEY not set. Set via --jwt-secret, JSON_TOKEN_KEY env, or .env")?;

        TokenKeys::new(secret, Duration::hours(self.token_ttl_hours))
            .context("Invalid token configuration")
    }
}
