//! Persons and the roles they hold in a movie.
//!
//! A person is identified by a (first name, last name) pair. The pair is
//! compared case-insensitively after trimming; the casing of the first
//! occurrence is what gets stored and displayed.

use serde::{Deserialize, Serialize};

use crate::{Result, RowError};

pub type PersonId = i64;

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person, as returned by the read paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:  PersonId,
  pub first_name: String,
  pub last_name:  String,
}

impl Person {
  /// `"First Last"`.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── PersonName ──────────────────────────────────────────────────────────────

/// A trimmed (first, last) name pair that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName {
  pub first: String,
  pub last:  String,
}

impl PersonName {
  /// Build a name from separate fields. Both parts must be non-blank.
  pub fn new(first: &str, last: &str) -> Result<Self, RowError> {
    let first = collapse_whitespace(first);
    let last = collapse_whitespace(last);
    if first.is_empty() || last.is_empty() {
      return Err(RowError::BlankName);
    }
    Ok(Self { first, last })
  }

  /// Split a full name on whitespace: the last token is the last name, all
  /// preceding tokens joined by single spaces form the first name.
  ///
  /// `"Francis Ford Coppola"` → (`"Francis Ford"`, `"Coppola"`).
  pub fn parse_full(raw: &str) -> Result<Self, RowError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.split_last() {
      Some((last, rest)) if !rest.is_empty() => Ok(Self {
        first: rest.join(" "),
        last:  (*last).to_owned(),
      }),
      _ => Err(RowError::InvalidPersonName(raw.trim().to_owned())),
    }
  }

  /// The lowercased (first, last) pair two names must share to be the same
  /// person. Folds every Unicode letter, not just ASCII.
  pub fn identity_key(&self) -> (String, String) {
    (self.first.to_lowercase(), self.last.to_lowercase())
  }
}

impl std::fmt::Display for PersonName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}", self.first, self.last)
  }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// The function a person has in a movie. Stored as a single-character
/// marker on the association row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Director,
  Actor,
}

impl Role {
  pub fn marker(self) -> &'static str {
    match self {
      Self::Director => "d",
      Self::Actor => "a",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_full_splits_on_last_token() {
    let name = PersonName::parse_full("  Francis  Ford Coppola ").unwrap();
    assert_eq!(name.first, "Francis Ford");
    assert_eq!(name.last, "Coppola");
  }

  #[test]
  fn parse_full_rejects_single_token() {
    assert_eq!(
      PersonName::parse_full("Madonna"),
      Err(RowError::InvalidPersonName("Madonna".into()))
    );
    assert!(PersonName::parse_full("   ").is_err());
  }

  #[test]
  fn new_rejects_blank_parts() {
    assert_eq!(PersonName::new("Jane", "  "), Err(RowError::BlankName));
    let name = PersonName::new(" Mary  Ann ", "Doe").unwrap();
    assert_eq!(name.first, "Mary Ann");
  }

  #[test]
  fn identity_key_folds_non_ascii_case() {
    let upper = PersonName::new("Émile", "ZOLA").unwrap();
    let lower = PersonName::new("émile", "zola").unwrap();
    assert_ne!(upper, lower);
    assert_eq!(upper.identity_key(), lower.identity_key());
    assert_eq!(
      PersonName::new("Åsa", "Berg").unwrap().identity_key(),
      ("åsa".to_owned(), "berg".to_owned())
    );
  }

  #[test]
  fn role_markers() {
    assert_eq!(Role::Director.marker(), "d");
    assert_eq!(Role::Actor.marker(), "a");
  }
}
