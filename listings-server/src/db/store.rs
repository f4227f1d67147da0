//! Store abstraction used by the listing service
//!
//! Implementations must keep the same semantics:
//! - `find_homes` orders by home id ascending
//! - image lists keep insertion order
//! - `create_home` writes the home and its images atomically
//! - `update_home` / `delete_home` only touch a row owned by `realtor_id`

use async_trait::async_trait;

use crate::models::{
    Home, HomeChanges, HomeDetail, HomeFilter, HomeSummary, Inquiry, Message, NewHome,
    NewMessage, NewUser, User,
};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("constraint violated: {0}")]
    Constraint(String),
}

/// Typed record operations over homes, images, users, and messages
#[async_trait]
pub trait HomeStore: Send + Sync {
    /// Homes matching every predicate of `filter`, each with its first image.
    async fn find_homes(&self, filter: &HomeFilter) -> Result<Vec<HomeSummary>, DbError>;

    /// Single home with all of its images.
    async fn find_home(&self, id: i32) -> Result<Option<HomeDetail>, DbError>;

    /// Insert the home bound to `realtor_id` plus its images in one unit.
    async fn create_home(&self, realtor_id: i32, home: &NewHome) -> Result<Home, DbError>;

    /// Apply `changes` where id and owner both match. `None` when no row did.
    async fn update_home(
        &self,
        id: i32,
        realtor_id: i32,
        changes: &HomeChanges,
    ) -> Result<Option<Home>, DbError>;

    /// Delete where id and owner both match. `None` when no row did.
    async fn delete_home(&self, id: i32, realtor_id: i32) -> Result<Option<Home>, DbError>;

    /// Owning realtor of a home.
    async fn find_realtor(&self, home_id: i32) -> Result<Option<User>, DbError>;

    async fn create_user(&self, user: &NewUser) -> Result<User, DbError>;

    async fn find_user(&self, id: i32) -> Result<Option<User>, DbError>;

    async fn create_message(&self, message: &NewMessage) -> Result<Message, DbError>;

    /// Messages on a home addressed to `realtor_id`, oldest first.
    async fn find_messages(&self, home_id: i32, realtor_id: i32) -> Result<Vec<Inquiry>, DbError>;

    /// Round trip to the backing store.
    async fn ping(&self) -> Result<(), DbError>;
}
