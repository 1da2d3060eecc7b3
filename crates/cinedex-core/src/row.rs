//! Parsing of the two comma-separated resource formats.
//!
//! Movies: `title,year,director1 & director2 & ...`
//! Actors: `first_name,last_name,movie_title,movie_year,director1 & ...`
//!
//! Fields are split on every comma; extra trailing fields are ignored.

use crate::{RowError, movie::MovieKey, person::PersonName};

/// Prefix of the optional header line in the movie resource.
pub const MOVIES_HEADER_PREFIX: &str = "movie_title";
/// Prefix of the optional header line in the actor resource.
pub const ACTORS_HEADER_PREFIX: &str = "first_name";

/// True when `line` starts with the header prefix. Purely a prefix check: a
/// data row that happens to start with the prefix is treated as a header.
pub fn is_header(line: &str, prefix: &str) -> bool {
  line.trim_start().starts_with(prefix)
}

fn parse_year(raw: &str) -> Result<i32, RowError> {
  raw
    .trim()
    .parse()
    .map_err(|_| RowError::InvalidYear(raw.trim().to_owned()))
}

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, RowError> {
  let fields: Vec<&str> = line.split(',').collect();
  if fields.len() < expected {
    return Err(RowError::TooFewFields { expected, found: fields.len() });
  }
  Ok(fields)
}

// ─── MovieRow ────────────────────────────────────────────────────────────────

/// One parsed line of the movie resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRow {
  /// Trimmed title, casing as authored.
  pub title:          String,
  pub year:           i32,
  /// Directors in order of appearance.
  pub directors:      Vec<PersonName>,
  /// The raw `&`-separated director field, used to build the [`MovieKey`].
  pub director_names: String,
}

impl MovieRow {
  pub fn parse(line: &str) -> Result<Self, RowError> {
    let fields = split_fields(line, 3)?;
    let title = fields[0].trim().to_owned();
    let year = parse_year(fields[1])?;
    let director_names = fields[2].trim().to_owned();

    let directors = director_names
      .split('&')
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .map(PersonName::parse_full)
      .collect::<Result<Vec<_>, _>>()?;
    if directors.is_empty() {
      return Err(RowError::NoDirectors);
    }

    Ok(Self { title, year, directors, director_names })
  }

  /// The title as stored in the identity column: trimmed and lowercased.
  pub fn normalized_title(&self) -> String { self.title.to_lowercase() }

  pub fn key(&self) -> MovieKey {
    MovieKey::new(&self.title, self.year, &self.director_names)
  }
}

// ─── ActorRow ────────────────────────────────────────────────────────────────

/// One parsed line of the actor resource: "this person acts in that movie".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRow {
  pub actor:          PersonName,
  pub movie_title:    String,
  pub movie_year:     i32,
  pub director_names: String,
}

impl ActorRow {
  pub fn parse(line: &str) -> Result<Self, RowError> {
    let fields = split_fields(line, 5)?;
    let actor = PersonName::new(fields[0], fields[1])?;
    let movie_year = parse_year(fields[3])?;
    Ok(Self {
      actor,
      movie_title: fields[2].trim().to_owned(),
      movie_year,
      director_names: fields[4].trim().to_owned(),
    })
  }

  pub fn key(&self) -> MovieKey {
    MovieKey::new(&self.movie_title, self.movie_year, &self.director_names)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_movie_row_with_several_directors() {
    let row = MovieRow::parse(" Fargo ,1996, Joel Coen & Ethan Coen").unwrap();
    assert_eq!(row.title, "Fargo");
    assert_eq!(row.normalized_title(), "fargo");
    assert_eq!(row.year, 1996);
    assert_eq!(row.directors.len(), 2);
    assert_eq!(row.directors[1].first, "Ethan");
    assert_eq!(row.key(), MovieKey::new("fargo", 1996, "ethan coen & joel coen"));
  }

  #[test]
  fn movie_row_errors() {
    assert_eq!(
      MovieRow::parse("BADROW"),
      Err(RowError::TooFewFields { expected: 3, found: 1 })
    );
    assert_eq!(
      MovieRow::parse("Heat,nineteen,Michael Mann"),
      Err(RowError::InvalidYear("nineteen".into()))
    );
    assert_eq!(
      MovieRow::parse("Heat,1995,Mann"),
      Err(RowError::InvalidPersonName("Mann".into()))
    );
    assert_eq!(MovieRow::parse("Heat,1995, & "), Err(RowError::NoDirectors));
  }

  #[test]
  fn actor_row_matches_movie_key() {
    let movie = MovieRow::parse("M1,2000,John Smith").unwrap();
    let actor = ActorRow::parse("Jane, Doe ,m1,2000,JOHN SMITH").unwrap();
    assert_eq!(actor.actor, PersonName::new("Jane", "Doe").unwrap());
    assert_eq!(actor.key(), movie.key());
  }

  #[test]
  fn short_actor_row_is_rejected() {
    assert_eq!(
      ActorRow::parse("Jane,Doe,M1"),
      Err(RowError::TooFewFields { expected: 5, found: 3 })
    );
    assert_eq!(
      ActorRow::parse("Jane,Doe,M1,20x0,John Smith"),
      Err(RowError::InvalidYear("20x0".into()))
    );
  }

  #[test]
  fn header_detection_is_a_prefix_check() {
    assert!(is_header("movie_title,year,directors", MOVIES_HEADER_PREFIX));
    assert!(is_header("first_name,last_name", ACTORS_HEADER_PREFIX));
    assert!(!is_header("Heat,1995,Michael Mann", MOVIES_HEADER_PREFIX));
  }
}
