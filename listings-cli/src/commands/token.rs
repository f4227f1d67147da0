//! Bearer token minting

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use listings_server::db::PgHomeStore;
use listings_server::HomeService;

use super::{DatabaseArgs, TokenKeyArgs};

#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// Id of the user the token identifies
    pub user_id: i32,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub tokens: TokenKeyArgs,
}

pub async fn run_token(args: TokenArgs) -> Result<()> {
    let keys = args.tokens.keys()?;
    let pool = args.database.connect().await?;
    let service = HomeService::new(Arc::new(PgHomeStore::new(pool)));

    let Some(user) = service
        .find_user(args.user_id)
        .await
        .context("Failed to look up user")?
    else {
        bail!("user {} does not exist", args.user_id);
    };

    tracing::debug!(user_id = user.id, user_type = %user.user_type, "minting token");
    println!("{}", keys.issue(&user).context("Failed to sign token")?);
    Ok(())
}
