//! Encoding and decoding helpers between domain types and SQLite rows.
//!
//! Movies keep their directors as a colon-joined id list in
//! `movie.director_ids`; [`load_directors`] turns one such list into
//! [`Person`]s inside a connection closure.

use cinedex_core::{
  movie::{DirectorIds, Movie},
  person::{Person, Role},
};
use rusqlite::{Connection, OptionalExtension as _, Row, types::Value};

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> Value { Value::Text(role.marker().to_owned()) }

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `input%` with `\`, `%` and `_` in `input` escaped. Pair with
/// `ESCAPE '\'` in the SQL.
pub fn like_prefix(input: &str) -> Value {
  let mut pattern = String::with_capacity(input.len() + 1);
  for c in input.chars() {
    if matches!(c, '\\' | '%' | '_') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  Value::Text(pattern)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawMovie::from_row`]; expects the alias `m`.
pub const MOVIE_COLUMNS: &str = "m.movie_id, m.display_title, m.year, m.director_ids";

/// Column list matching [`person_from_row`]; expects the alias `p`.
pub const PERSON_COLUMNS: &str = "p.person_id, p.first_name, p.last_name";

pub fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    person_id:  row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
  })
}

/// A `movie` row before its director ids are resolved.
pub struct RawMovie {
  pub movie_id:     i64,
  pub title:        String,
  pub year:         i32,
  pub director_ids: String,
}

impl RawMovie {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      movie_id:     row.get(0)?,
      title:        row.get(1)?,
      year:         row.get(2)?,
      director_ids: row.get(3)?,
    })
  }

  /// Parse the stored id list; a corrupted column is an error.
  pub fn director_ids(&self) -> cinedex_core::Result<DirectorIds> {
    DirectorIds::decode(&self.director_ids)
  }

  pub fn into_movie(self, directors: Vec<Person>) -> Movie {
    Movie {
      movie_id: self.movie_id,
      title: self.title,
      year: self.year,
      directors,
    }
  }
}

/// Resolve ids one by one so the result keeps the order of `ids`.
pub fn load_directors(
  conn: &Connection,
  ids: &DirectorIds,
) -> rusqlite::Result<Vec<Person>> {
  let mut stmt = conn.prepare_cached(
    "SELECT p.person_id, p.first_name, p.last_name FROM person p WHERE p.person_id = ?1",
  )?;
  let mut directors = Vec::with_capacity(ids.0.len());
  for id in &ids.0 {
    if let Some(person) = stmt.query_row([id], person_from_row).optional()? {
      directors.push(person);
    }
  }
  Ok(directors)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_prefix_escapes_wildcards() {
    assert_eq!(like_prefix("50%_off"), Value::Text("50\\%\\_off%".into()));
    assert_eq!(like_prefix(""), Value::Text("%".into()));
  }
}
