//! PostgreSQL listing store
//!
//! - list: first image pulled by correlated subquery (no N+1)
//! - create: home + images in one transaction
//! - update/delete: conditional on owner, single statement

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::store::{DbError, HomeStore};
use crate::models::{
    Home, HomeChanges, HomeDetail, HomeFilter, HomeSummary, Inquiry, Message, NewHome,
    NewMessage, NewUser, User,
};

const HOME_COLUMNS: &str = "homes.id, homes.address, homes.city, homes.price, \
     homes.number_of_bedrooms, homes.number_of_bathrooms, homes.land_size, \
     homes.property_type, homes.listed_date, homes.realtor_id";

/// Listing store backed by a Postgres pool
#[derive(Clone)]
pub struct PgHomeStore {
    pool: PgPool,
}

impl PgHomeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map constraint violations to a readable error, keep the rest as-is.
fn classify(err: sqlx::Error) -> DbError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            DbError::Constraint(db.message().to_owned())
        }
        _ => DbError::Sqlx(err),
    }
}

#[async_trait]
impl HomeStore for PgHomeStore {
    async fn find_homes(&self, filter: &HomeFilter) -> Result<Vec<HomeSummary>, DbError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query.push(HOME_COLUMNS).push(
            r#",
            (SELECT images.url FROM images
             WHERE images.home_id = homes.id
             ORDER BY images.id LIMIT 1) AS image
            FROM homes
            WHERE TRUE"#,
        );

        if let Some(city) = &filter.city {
            query.push(" AND homes.city = ").push_bind(city.clone());
        }
        if let Some(min) = filter.price.min {
            query.push(" AND homes.price >= ").push_bind(min);
        }
        if let Some(max) = filter.price.max {
            query.push(" AND homes.price <= ").push_bind(max);
        }
        if let Some(min) = filter.land_size.min {
            query.push(" AND homes.land_size >= ").push_bind(min);
        }
        if let Some(max) = filter.land_size.max {
            query.push(" AND homes.land_size <= ").push_bind(max);
        }
        if let Some(n) = filter.number_of_bedrooms {
            query.push(" AND homes.number_of_bedrooms = ").push_bind(n);
        }
        if let Some(n) = filter.number_of_bathrooms {
            query.push(" AND homes.number_of_bathrooms = ").push_bind(n);
        }
        if let Some(kind) = filter.property_type {
            query.push(" AND homes.property_type = ").push_bind(kind);
        }
        query.push(" ORDER BY homes.id ASC");

        let homes = query
            .build_query_as::<HomeSummary>()
            .fetch_all(&self.pool)
            .await?;
        Ok(homes)
    }

    async fn find_home(&self, id: i32) -> Result<Option<HomeDetail>, DbError> {
        let sql = format!(
            r#"
            SELECT {HOME_COLUMNS},
                ARRAY(
                    SELECT images.url FROM images
                    WHERE images.home_id = homes.id
                    ORDER BY images.id
                ) AS images
            FROM homes
            WHERE homes.id = $1
            "#
        );
        let home = sqlx::query_as::<_, HomeDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(home)
    }

    async fn create_home(&self, realtor_id: i32, new: &NewHome) -> Result<Home, DbError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO homes (
                address, city, price, number_of_bedrooms, number_of_bathrooms,
                land_size, property_type, realtor_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {HOME_COLUMNS}
            "#
        );
        let home: Home = sqlx::query_as(&sql)
            .bind(&new.address)
            .bind(&new.city)
            .bind(new.price)
            .bind(new.number_of_bedrooms)
            .bind(new.number_of_bathrooms)
            .bind(new.land_size)
            .bind(new.property_type)
            .bind(realtor_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify)?;

        if !new.images.is_empty() {
            // ORDER BY ord keeps serial ids in the order the caller gave
            sqlx::query(
                r#"
                INSERT INTO images (url, home_id)
                SELECT t.url, $2
                FROM UNNEST($1::text[]) WITH ORDINALITY AS t(url, ord)
                ORDER BY t.ord
                "#,
            )
            .bind(&new.images)
            .bind(home.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(home)
    }

    async fn update_home(
        &self,
        id: i32,
        realtor_id: i32,
        changes: &HomeChanges,
    ) -> Result<Option<Home>, DbError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE homes SET updated_at = NOW()");

        if let Some(address) = &changes.address {
            query.push(", address = ").push_bind(address.clone());
        }
        if let Some(city) = &changes.city {
            query.push(", city = ").push_bind(city.clone());
        }
        if let Some(price) = changes.price {
            query.push(", price = ").push_bind(price);
        }
        if let Some(n) = changes.number_of_bedrooms {
            query.push(", number_of_bedrooms = ").push_bind(n);
        }
        if let Some(n) = changes.number_of_bathrooms {
            query.push(", number_of_bathrooms = ").push_bind(n);
        }
        if let Some(land_size) = changes.land_size {
            query.push(", land_size = ").push_bind(land_size);
        }
        if let Some(kind) = changes.property_type {
            query.push(", property_type = ").push_bind(kind);
        }

        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND realtor_id = ")
            .push_bind(realtor_id)
            .push(" RETURNING ")
            .push(HOME_COLUMNS);

        let home = query
            .build_query_as::<Home>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(home)
    }

    async fn delete_home(&self, id: i32, realtor_id: i32) -> Result<Option<Home>, DbError> {
        let sql = format!(
            "DELETE FROM homes WHERE id = $1 AND realtor_id = $2 RETURNING {HOME_COLUMNS}"
        );
        let home = sqlx::query_as::<_, Home>(&sql)
            .bind(id)
            .bind(realtor_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(home)
    }

    async fn find_realtor(&self, home_id: i32) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.phone, u.user_type
            FROM homes h
            JOIN users u ON u.id = h.realtor_id
            WHERE h.id = $1
            "#,
        )
        .bind(home_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone, user_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, user_type
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(user.user_type)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(user)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, phone, user_type FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_message(&self, message: &NewMessage) -> Result<Message, DbError> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (message, home_id, buyer_id, realtor_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, message, home_id, buyer_id, realtor_id
            "#,
        )
        .bind(message.message.as_str())
        .bind(message.home_id)
        .bind(message.buyer_id)
        .bind(message.realtor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(message)
    }

    async fn find_messages(&self, home_id: i32, realtor_id: i32) -> Result<Vec<Inquiry>, DbError> {
        let messages = sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT m.message, u.name, u.email, u.phone
            FROM messages m
            JOIN users u ON u.id = m.buyer_id
            WHERE m.home_id = $1 AND m.realtor_id = $2
            ORDER BY m.id ASC
            "#,
        )
        .bind(home_id)
        .bind(realtor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
