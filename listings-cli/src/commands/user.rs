//! User administration
//!
//! Users are normally provisioned by an identity service; `user add` covers
//! local setups and seeding.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use listings_server::db::PgHomeStore;
use listings_server::models::{NewUser, UserType};
use listings_server::HomeService;

use super::{DatabaseArgs, TokenKeyArgs};

#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a user and print it with a fresh bearer token
    Add(AddArgs),
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Email address (unique)
    #[arg(long)]
    pub email: String,

    /// Contact phone number
    #[arg(long)]
    pub phone: String,

    /// Role: buyer, realtor, or admin
    #[arg(long = "type", value_parser = parse_user_type)]
    pub user_type: UserType,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub tokens: TokenKeyArgs,
}

fn parse_user_type(s: &str) -> Result<UserType, String> {
    s.parse().map_err(|e: listings_server::models::ValidationError| e.to_string())
}

pub async fn run_user(args: UserArgs) -> Result<()> {
    match args.command {
        UserCommands::Add(args) => run_add(args).await,
    }
}

async fn run_add(args: AddArgs) -> Result<()> {
    let keys = args.tokens.keys()?;
    let new_user = NewUser {
        name: args.name,
        email: args.email,
        phone: args.phone,
        user_type: args.user_type,
    }
    .validate()?;

    let pool = args.database.connect().await?;
    let service = HomeService::new(Arc::new(PgHomeStore::new(pool)));

    let user = service
        .register_user(new_user)
        .await
        .context("Failed to register user")?;
    let token = keys.issue(&user).context("Failed to sign token")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "user": user, "token": token }))?
    );
    Ok(())
}
