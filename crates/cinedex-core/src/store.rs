//! The `CatalogWriter` and `MovieCatalog` traits and supporting types.
//!
//! The traits are implemented by storage backends (e.g.
//! `cinedex-store-sqlite`). The ingestion pipeline depends on
//! [`CatalogWriter`]; read surfaces (`cinedex-api`) depend on
//! [`MovieCatalog`]. Neither depends on a concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  movie::{DirectorIds, Movie, MovieId},
  person::{Person, PersonId, PersonName, Role},
};

// ─── Supporting types ────────────────────────────────────────────────────────

/// Limit/offset pagination for every list and search read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
  pub limit:  u32,
  pub offset: u32,
}

impl Default for Page {
  fn default() -> Self { Self { limit: 10, offset: 0 } }
}

impl Page {
  pub fn new(limit: u32, offset: u32) -> Self { Self { limit, offset } }
}

/// Result of an insert-if-absent style write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted<Id> {
  pub id:       Id,
  /// `false` when the row already existed.
  pub inserted: bool,
}

/// What the integrity sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOutcome {
  pub movies_deleted:       u64,
  /// All association rows of the deleted movies, director rows included.
  pub associations_deleted: u64,
}

// ─── Write trait ─────────────────────────────────────────────────────────────

/// Write side of the relational store, as used by the ingestion workers.
///
/// Every method returns a `Send` future so two workers can drive the same
/// store from separate tokio tasks.
pub trait CatalogWriter: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Drop and recreate all tables.
  fn reset(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Look up a person by [`PersonName::identity_key`] and insert it if
  /// absent. Case is folded for all Unicode letters.
  fn insert_person_if_not_exists(
    &self,
    name: PersonName,
  ) -> impl Future<Output = Result<Upserted<PersonId>, Self::Error>> + Send + '_;

  /// Look up a movie by its (title, year, director ids) triple. If found,
  /// rewrite its director-id field and return the existing id with
  /// `inserted = false`; otherwise insert it.
  ///
  /// `title` is the normalized identity title, `display_title` the authored
  /// form shown on read paths.
  fn insert_or_update_movie(
    &self,
    title: String,
    display_title: String,
    year: i32,
    directors: DirectorIds,
  ) -> impl Future<Output = Result<Upserted<MovieId>, Self::Error>> + Send + '_;

  /// Unconditionally append a (movie, person, role) association.
  fn insert_association(
    &self,
    movie_id: MovieId,
    person_id: PersonId,
    role: Role,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete every movie with fewer than `min_cast` actor associations,
  /// together with all of its associations. Must not run concurrently with
  /// ingestion.
  fn sweep_undercast_movies(
    &self,
    min_cast: u32,
  ) -> impl Future<Output = Result<SweepOutcome, Self::Error>> + Send + '_;
}

// ─── Read trait ──────────────────────────────────────────────────────────────

/// Read side of the store: paginated listings, prefix searches and lookups.
///
/// Prefix matches are case-insensitive. Movie listings are ordered by title
/// then year; person listings by first name then last name.
pub trait MovieCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn list_movies(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  fn search_movies(
    &self,
    title_prefix: String,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// Persons directing at least one movie.
  fn list_directors(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Persons acting in at least one movie.
  fn list_actors(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Name search restricted to directors. A blank `text` yields nothing.
  fn search_directors(
    &self,
    text: String,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Name search restricted to actors. A blank `text` yields nothing.
  fn search_actors(
    &self,
    text: String,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn actors_in_movie(
    &self,
    movie_id: MovieId,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn movies_with_actor(
    &self,
    person_id: PersonId,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  fn movies_by_director(
    &self,
    person_id: PersonId,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// `"First Last"`, or `None` for an unknown id.
  fn person_name(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// `"Title (Year) by D1 & D2"`, or `None` for an unknown id.
  fn movie_full_title(
    &self,
    movie_id: MovieId,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  fn get_movie(
    &self,
    movie_id: MovieId,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;
}
