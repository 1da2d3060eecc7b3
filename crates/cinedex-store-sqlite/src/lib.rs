//! SQLite backend for the cinedex movie catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod catalog;
mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use rusqlite::types::Value as SqlValue;
pub use store::{SqliteStore, Table};

#[cfg(test)]
mod tests;
