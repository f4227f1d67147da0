//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use listings_server::db::migrations;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.database.connect().await?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    println!("Migrations applied");
    Ok(())
}
