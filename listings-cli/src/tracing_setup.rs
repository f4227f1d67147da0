//! Tracing setup for the listings CLI
//!
//! Usage:
//!   listings --debug ...                    # Debug logging for our crates
//!   RUST_LOG=listings_server=trace listings # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging for the listings crates and request traces
    pub debug: bool,
}

/// Filter used when RUST_LOG is unset. Dependencies stay at warn so pool
/// chatter from sqlx does not drown request logs.
fn default_directives(debug: bool) -> &'static str {
    if debug {
        "warn,listings=debug,listings_server=debug,tower_http=debug,sqlx=info"
    } else {
        "warn,listings=info,listings_server=info,tower_http=info"
    }
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
