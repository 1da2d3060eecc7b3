//! Error type for `cinedex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cinedex_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A generic [`query`](crate::SqliteStore::query) named a column the
  /// table does not have.
  #[error("table {table} has no column {column:?}")]
  UnknownColumn { table: &'static str, column: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
