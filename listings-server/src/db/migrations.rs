//! Schema migrations for the listings tables
//!
//! Every statement is idempotent so `run` is safe on each start.

use sqlx::PgPool;

use super::DbError;

const STATEMENTS: &[&str] = &[
    r#"
    DO $$ BEGIN
        CREATE TYPE user_type AS ENUM ('BUYER', 'REALTOR', 'ADMIN');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE property_type AS ENUM ('RESIDENTIAL', 'CONDO');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL,
        user_type user_type NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS homes (
        id SERIAL PRIMARY KEY,
        address TEXT NOT NULL,
        city TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        number_of_bedrooms INTEGER NOT NULL,
        number_of_bathrooms INTEGER NOT NULL,
        land_size DOUBLE PRECISION NOT NULL,
        property_type property_type NOT NULL,
        listed_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        realtor_id INTEGER NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_homes_city ON homes(city)",
    "CREATE INDEX IF NOT EXISTS idx_homes_realtor ON homes(realtor_id)",
    r#"
    CREATE TABLE IF NOT EXISTS images (
        id SERIAL PRIMARY KEY,
        url TEXT NOT NULL,
        home_id INTEGER NOT NULL REFERENCES homes(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_images_home ON images(home_id, id)",
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id SERIAL PRIMARY KEY,
        message TEXT NOT NULL,
        home_id INTEGER NOT NULL REFERENCES homes(id) ON DELETE CASCADE,
        buyer_id INTEGER NOT NULL REFERENCES users(id),
        realtor_id INTEGER NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_messages_home_realtor ON messages(home_id, realtor_id)",
];

/// Run all listings migrations
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running listings migrations...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(statements = STATEMENTS.len(), "Migrations complete");
    Ok(())
}
