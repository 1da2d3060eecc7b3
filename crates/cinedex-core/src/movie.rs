//! Movies, their director-id lists, and the in-memory correlation key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  person::{Person, PersonId, collapse_whitespace},
};

pub type MovieId = i64;

// ─── Movie ───────────────────────────────────────────────────────────────────

/// A persisted movie with its directors resolved, as returned by the read
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:  MovieId,
  /// Title as authored in the movie resource.
  pub title:     String,
  pub year:      i32,
  /// Directors in the order they appear in the movie's director-id list.
  pub directors: Vec<Person>,
}

impl Movie {
  /// `"Title (Year) by D1 & D2"`, or `"Title (Year)"` without directors.
  pub fn full_title(&self) -> String {
    format_full_title(&self.title, self.year, &self.directors)
  }
}

pub fn format_full_title(title: &str, year: i32, directors: &[Person]) -> String {
  if directors.is_empty() {
    return format!("{title} ({year})");
  }
  let names: Vec<String> = directors.iter().map(Person::full_name).collect();
  format!("{title} ({year}) by {}", names.join(" & "))
}

// ─── DirectorIds ─────────────────────────────────────────────────────────────

/// The ordered director ids of a movie, encoded as `"3:1:7"` in the
/// `director_ids` column. Order is order of appearance in the resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectorIds(pub Vec<PersonId>);

impl DirectorIds {
  pub fn encode(&self) -> String {
    self
      .0
      .iter()
      .map(PersonId::to_string)
      .collect::<Vec<_>>()
      .join(":")
  }

  pub fn decode(s: &str) -> Result<Self> {
    s.split(':')
      .map(|part| part.trim().parse::<PersonId>())
      .collect::<std::result::Result<Vec<_>, _>>()
      .map(Self)
      .map_err(|_| Error::InvalidDirectorIds(s.to_owned()))
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Display for DirectorIds {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.encode())
  }
}

// ─── MovieKey ────────────────────────────────────────────────────────────────

/// Correlation key between the movie and actor resources:
/// `"<lowercased title>_<year>_<sorted lowercased director names joined by :>"`.
///
/// Directors are matched by name because the actor resource never sees
/// database ids. Sorting makes `"A & B"` and `"B & A"` the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MovieKey(String);

impl MovieKey {
  pub fn new(title: &str, year: i32, director_names: &str) -> Self {
    let mut directors: Vec<String> = director_names
      .split('&')
      .map(|d| collapse_whitespace(d).to_lowercase())
      .filter(|d| !d.is_empty())
      .collect();
    directors.sort();
    Self(format!(
      "{}_{year}_{}",
      title.trim().to_lowercase(),
      directors.join(":")
    ))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for MovieKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
