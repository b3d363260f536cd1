//! # reachy-mini-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement [`ConfigEntryRepository`](reachy_mini_app::ports::ConfigEntryRepository)
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `reachy-mini-app` (for port traits) and `reachy-mini-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod config_entry_repo;
mod error;
mod pool;

pub use config_entry_repo::SqliteConfigEntryRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
