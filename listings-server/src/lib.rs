//! listings-server: HTTP backend for real-estate listings
//!
//! Homes with images, realtor ownership, and buyer inquiries, served over
//! axum and stored in Postgres (or memory, for tests).

pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use auth::{AuthError, Claims, TokenKeys};
pub use db::{DbError, HomeStore, MemoryHomeStore, PgHomeStore};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use service::{HomeService, ServiceError};
