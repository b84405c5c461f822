//! Pocketbook Storage Layer
//!
//! SQLite-backed durable key/value storage. This is the client's "local
//! storage": entries survive process restarts and every write is committed
//! before the call returns.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
