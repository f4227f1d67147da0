//! Database layer - connection pool, migrations, and listing stores
//!
//! # Design Principles
//!
//! - Connection pool with explicit limits - no Arc<Mutex<Connection>>
//! - List queries pull the first image in the same statement - no N+1 queries
//! - Ownership checks live in the mutating statement - no check-then-mutate
//! - Transactions for multi-step operations

pub mod pool;
pub mod migrations;
pub mod store;
pub mod postgres;
pub mod memory;

pub use pool::{create_pool, create_pool_with_options};
pub use store::{DbError, HomeStore};
pub use postgres::PgHomeStore;
pub use memory::MemoryHomeStore;
