//! Error types for `cinedex-core`.

use thiserror::Error;

/// Why a single resource line could not be turned into a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
  #[error("expected at least {expected} comma-separated fields, found {found}")]
  TooFewFields { expected: usize, found: usize },

  #[error("year is not an integer: {0:?}")]
  InvalidYear(String),

  #[error("person name needs a first and a last name: {0:?}")]
  InvalidPersonName(String),

  #[error("row names no directors")]
  NoDirectors,

  #[error("actor name field is blank")]
  BlankName,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed row: {0}")]
  Row(#[from] RowError),

  /// A stored `director_ids` value is not a colon-separated id list.
  #[error("invalid director id list: {0:?}")]
  InvalidDirectorIds(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
