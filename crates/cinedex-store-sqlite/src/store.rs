//! [`SqliteStore`], the SQLite implementation of [`CatalogWriter`].

use std::path::Path;

use cinedex_core::{
  movie::{DirectorIds, MovieId},
  person::{PersonId, PersonName, Role},
  store::{CatalogWriter, SweepOutcome, Upserted},
};
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  Error, Result,
  encode::encode_role,
  schema::{DROP_TABLES, PRAGMAS, TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A cinedex catalog backed by a single SQLite file.
///
/// Clones share one reference-counted connection and one database thread,
/// so each `call` closure runs atomically with respect to every other clone.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(TABLES)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Generic filtered projection: `SELECT columns FROM table WHERE c1 = v1
  /// AND c2 = v2 ...`. An empty `columns` slice selects every column.
  ///
  /// Column names are checked against the table so no caller-supplied text
  /// reaches the SQL string.
  pub async fn query(
    &self,
    table: Table,
    columns: &[&str],
    predicate: &[(&str, Value)],
  ) -> Result<Vec<Vec<Value>>> {
    let selected: Vec<&'static str> = if columns.is_empty() {
      table.columns().to_vec()
    } else {
      columns
        .iter()
        .map(|c| table.column(c))
        .collect::<Result<_>>()?
    };

    let mut conds = Vec::with_capacity(predicate.len());
    let mut values = Vec::with_capacity(predicate.len());
    for (i, (column, value)) in predicate.iter().enumerate() {
      conds.push(format!("{} = ?{}", table.column(column)?, i + 1));
      values.push(value.clone());
    }
    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let sql = format!(
      "SELECT {} FROM {} {where_clause}",
      selected.join(", "),
      table.name()
    );
    let width = selected.len();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values.iter()), |row| {
            (0..width).map(|i| row.get::<_, Value>(i)).collect()
          })?
          .collect::<rusqlite::Result<Vec<Vec<Value>>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The three tables addressable through [`SqliteStore::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
  Movie,
  Person,
  MoviePerson,
}

impl Table {
  pub fn name(self) -> &'static str {
    match self {
      Self::Movie => "movie",
      Self::Person => "person",
      Self::MoviePerson => "movie_person",
    }
  }

  pub fn columns(self) -> &'static [&'static str] {
    match self {
      Self::Movie => &["movie_id", "title", "display_title", "year", "director_ids"],
      Self::Person => &[
        "person_id",
        "first_name",
        "last_name",
        "first_name_key",
        "last_name_key",
      ],
      Self::MoviePerson => &["movie_person_id", "movie_id", "person_id", "role"],
    }
  }

  fn column(self, name: &str) -> Result<&'static str> {
    self
      .columns()
      .iter()
      .copied()
      .find(|c| *c == name)
      .ok_or_else(|| Error::UnknownColumn {
        table:  self.name(),
        column: name.to_owned(),
      })
  }
}

// ─── CatalogWriter impl ──────────────────────────────────────────────────────

impl CatalogWriter for SqliteStore {
  type Error = Error;

  async fn reset(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(DROP_TABLES)?;
        conn.execute_batch(TABLES)?;
        Ok(())
      })
      .await?;
    tracing::info!("catalog tables recreated");
    Ok(())
  }

  async fn insert_person_if_not_exists(
    &self,
    name: PersonName,
  ) -> Result<Upserted<PersonId>> {
    let full_name = name.to_string();
    let (first_key, last_key) = name.identity_key();

    let upserted = self
      .conn
      .call(move |conn| {
        let existing: Option<PersonId> = conn
          .query_row(
            "SELECT person_id FROM person WHERE first_name_key = ?1 AND last_name_key = ?2",
            rusqlite::params![first_key, last_key],
            |r| r.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(Upserted { id, inserted: false });
        }

        conn.execute(
          "INSERT INTO person (first_name, last_name, first_name_key, last_name_key)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name.first, name.last, first_key, last_key],
        )?;
        Ok(Upserted { id: conn.last_insert_rowid(), inserted: true })
      })
      .await?;

    tracing::debug!(
      person_id = upserted.id,
      inserted = upserted.inserted,
      person = %full_name,
      "stored person"
    );
    Ok(upserted)
  }

  async fn insert_or_update_movie(
    &self,
    title: String,
    display_title: String,
    year: i32,
    directors: DirectorIds,
  ) -> Result<Upserted<MovieId>> {
    let director_ids = directors.encode();
    let log_title = title.clone();
    let log_ids = director_ids.clone();

    let upserted = self
      .conn
      .call(move |conn| {
        let existing: Option<MovieId> = conn
          .query_row(
            "SELECT movie_id FROM movie
             WHERE title = ?1 AND year = ?2 AND director_ids = ?3
             LIMIT 1",
            rusqlite::params![title, year, director_ids],
            |r| r.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          conn.execute(
            "UPDATE movie SET director_ids = ?1 WHERE movie_id = ?2",
            rusqlite::params![director_ids, id],
          )?;
          return Ok(Upserted { id, inserted: false });
        }

        conn.execute(
          "INSERT INTO movie (title, display_title, year, director_ids)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![title, display_title, year, director_ids],
        )?;
        Ok(Upserted { id: conn.last_insert_rowid(), inserted: true })
      })
      .await?;

    tracing::debug!(
      movie_id = upserted.id,
      inserted = upserted.inserted,
      "movie ({log_title:?}, {year}, {log_ids})"
    );
    Ok(upserted)
  }

  async fn insert_association(
    &self,
    movie_id: MovieId,
    person_id: PersonId,
    role: Role,
  ) -> Result<()> {
    let role_value = encode_role(role);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO movie_person (movie_id, person_id, role) VALUES (?1, ?2, ?3)",
          rusqlite::params![movie_id, person_id, role_value],
        )?;
        Ok(())
      })
      .await?;

    tracing::trace!(movie_id, person_id, role = role.marker(), "association");
    Ok(())
  }

  async fn sweep_undercast_movies(&self, min_cast: u32) -> Result<SweepOutcome> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let undercast: Vec<MovieId> = {
          let mut stmt = tx.prepare(
            "SELECT m.movie_id
             FROM movie m
             LEFT JOIN movie_person mp
               ON mp.movie_id = m.movie_id AND mp.role = 'a'
             GROUP BY m.movie_id
             HAVING COUNT(mp.person_id) < ?1",
          )?;
          stmt
            .query_map([min_cast], |r| r.get(0))?
            .collect::<rusqlite::Result<_>>()?
        };

        let mut outcome = SweepOutcome::default();
        for movie_id in &undercast {
          outcome.associations_deleted += tx
            .execute("DELETE FROM movie_person WHERE movie_id = ?1", [movie_id])?
            as u64;
          outcome.movies_deleted +=
            tx.execute("DELETE FROM movie WHERE movie_id = ?1", [movie_id])? as u64;
        }

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    tracing::info!(
      movies_deleted = outcome.movies_deleted,
      associations_deleted = outcome.associations_deleted,
      min_cast,
      "integrity sweep finished"
    );
    Ok(outcome)
  }
}
