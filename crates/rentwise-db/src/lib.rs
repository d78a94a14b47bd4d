//! Rentwise Database — SurrealDB connection management, schema
//! migrations and owner-scoped repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - [`repository::SurrealRentalStore`], the `rentwise-core` store bundle

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use repository::SurrealRentalStore;
pub use schema::{latest_version, run_migrations};
