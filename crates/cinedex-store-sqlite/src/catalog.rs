//! [`MovieCatalog`] implementation: the paginated read paths.

use cinedex_core::{
  movie::{Movie, MovieId},
  person::{Person, PersonId, Role},
  store::{MovieCatalog, Page},
};
use rusqlite::types::Value;

use crate::{
  Error, Result, SqliteStore,
  encode::{
    MOVIE_COLUMNS, PERSON_COLUMNS, RawMovie, encode_role, like_prefix, load_directors,
    person_from_row,
  },
};

fn page_values(page: Page) -> [Value; 2] {
  [
    Value::Integer(i64::from(page.limit)),
    Value::Integer(i64::from(page.offset)),
  ]
}

impl SqliteStore {
  /// Run a movie query selecting [`MOVIE_COLUMNS`] and resolve directors.
  async fn fetch_movies(&self, sql: String, params: Vec<Value>) -> Result<Vec<Movie>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawMovie::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws)
      })
      .await?;
    self.resolve_movies(raws).await
  }

  /// Decode every director list, then resolve them all in one round-trip.
  async fn resolve_movies(&self, raws: Vec<RawMovie>) -> Result<Vec<Movie>> {
    if raws.is_empty() {
      return Ok(Vec::new());
    }
    let ids = raws
      .iter()
      .map(RawMovie::director_ids)
      .collect::<cinedex_core::Result<Vec<_>>>()?;
    let directors = self
      .conn
      .call(move |conn| {
        let resolved = ids
          .iter()
          .map(|ids| load_directors(conn, ids))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(resolved)
      })
      .await?;
    Ok(
      raws
        .into_iter()
        .zip(directors)
        .map(|(raw, directors)| raw.into_movie(directors))
        .collect(),
    )
  }

  /// Run a person query selecting [`PERSON_COLUMNS`].
  async fn fetch_people(&self, sql: String, params: Vec<Value>) -> Result<Vec<Person>> {
    let people = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(people)
  }

  async fn people_with_role(&self, role: Role, page: Page) -> Result<Vec<Person>> {
    let [limit, offset] = page_values(page);
    let sql = format!(
      "SELECT DISTINCT {PERSON_COLUMNS}
       FROM person p
       JOIN movie_person mp ON mp.person_id = p.person_id
       WHERE mp.role = ?1
       ORDER BY p.first_name_key ASC, p.last_name_key ASC, p.person_id ASC
       LIMIT ?2 OFFSET ?3"
    );
    self.fetch_people(sql, vec![encode_role(role), limit, offset]).await
  }

  /// Name search over persons holding `role` in at least one movie.
  ///
  /// One word matches a first- or last-name prefix. Several words match
  /// (first word as first-name prefix AND the rest as last-name prefix), or
  /// the whole input as either prefix. Matching runs on the lowercased
  /// identity keys.
  async fn search_people(
    &self,
    role: Role,
    text: String,
    page: Page,
  ) -> Result<Vec<Person>> {
    let text = text.trim().to_lowercase();
    let text = text.as_str();
    if text.is_empty() {
      return Ok(Vec::new());
    }
    let (first_part, rest) = match text.split_once(' ') {
      Some((first, rest)) => (first, rest.trim()),
      None => (text, ""),
    };

    let [limit, offset] = page_values(page);
    let sql = format!(
      "SELECT {PERSON_COLUMNS}
       FROM person p
       WHERE ((p.first_name_key LIKE ?2 ESCAPE '\\' AND p.last_name_key LIKE ?3 ESCAPE '\\')
              OR p.first_name_key LIKE ?4 ESCAPE '\\'
              OR p.last_name_key  LIKE ?4 ESCAPE '\\')
         AND EXISTS (SELECT 1 FROM movie_person mp
                     WHERE mp.person_id = p.person_id AND mp.role = ?1)
       ORDER BY p.first_name_key ASC, p.last_name_key ASC, p.person_id ASC
       LIMIT ?5 OFFSET ?6"
    );
    let params = vec![
      encode_role(role),
      like_prefix(first_part),
      like_prefix(rest),
      like_prefix(text),
      limit,
      offset,
    ];
    self.fetch_people(sql, params).await
  }

  async fn movies_for_person(
    &self,
    person_id: PersonId,
    role: Role,
    page: Page,
  ) -> Result<Vec<Movie>> {
    let [limit, offset] = page_values(page);
    let sql = format!(
      "SELECT DISTINCT {MOVIE_COLUMNS}
       FROM movie m
       JOIN movie_person mp ON mp.movie_id = m.movie_id
       WHERE mp.person_id = ?1 AND mp.role = ?2
       ORDER BY m.title ASC, m.year ASC, m.director_ids ASC
       LIMIT ?3 OFFSET ?4"
    );
    self
      .fetch_movies(sql, vec![Value::Integer(person_id), encode_role(role), limit, offset])
      .await
  }
}

// ─── MovieCatalog impl ───────────────────────────────────────────────────────

impl MovieCatalog for SqliteStore {
  type Error = Error;

  async fn list_movies(&self, page: Page) -> Result<Vec<Movie>> {
    let [limit, offset] = page_values(page);
    let sql = format!(
      "SELECT {MOVIE_COLUMNS}
       FROM movie m
       ORDER BY m.title ASC, m.year ASC, m.movie_id ASC
       LIMIT ?1 OFFSET ?2"
    );
    self.fetch_movies(sql, vec![limit, offset]).await
  }

  async fn search_movies(&self, title_prefix: String, page: Page) -> Result<Vec<Movie>> {
    let [limit, offset] = page_values(page);
    let sql = format!(
      "SELECT {MOVIE_COLUMNS}
       FROM movie m
       WHERE m.title LIKE ?1 ESCAPE '\\'
       ORDER BY m.title ASC, m.year ASC, m.movie_id ASC
       LIMIT ?2 OFFSET ?3"
    );
    let pattern = like_prefix(&title_prefix.trim().to_lowercase());
    self.fetch_movies(sql, vec![pattern, limit, offset]).await
  }

  async fn list_directors(&self, page: Page) -> Result<Vec<Person>> {
    self.people_with_role(Role::Director, page).await
  }

  async fn list_actors(&self, page: Page) -> Result<Vec<Person>> {
    self.people_with_role(Role::Actor, page).await
  }

  async fn search_directors(&self, text: String, page: Page) -> Result<Vec<Person>> {
    self.search_people(Role::Director, text, page).await
  }

  async fn search_actors(&self, text: String, page: Page) -> Result<Vec<Person>> {
    self.search_people(Role::Actor, text, page).await
  }

  async fn actors_in_movie(&self, movie_id: MovieId, page: Page) -> Result<Vec<Person>> {
    let [limit, offset] = page_values(page);
    let sql = format!(
      "SELECT DISTINCT {PERSON_COLUMNS}
       FROM person p
       JOIN movie_person mp ON mp.person_id = p.person_id
       WHERE mp.role = ?1 AND mp.movie_id = ?2
       ORDER BY p.first_name_key ASC, p.last_name_key ASC, p.person_id ASC
       LIMIT ?3 OFFSET ?4"
    );
    self
      .fetch_people(
        sql,
        vec![encode_role(Role::Actor), Value::Integer(movie_id), limit, offset],
      )
      .await
  }

  async fn movies_with_actor(&self, person_id: PersonId, page: Page) -> Result<Vec<Movie>> {
    self.movies_for_person(person_id, Role::Actor, page).await
  }

  async fn movies_by_director(&self, person_id: PersonId, page: Page) -> Result<Vec<Movie>> {
    self.movies_for_person(person_id, Role::Director, page).await
  }

  async fn person_name(&self, person_id: PersonId) -> Result<Option<String>> {
    let sql = format!("SELECT {PERSON_COLUMNS} FROM person p WHERE p.person_id = ?1");
    let person = self
      .fetch_people(sql, vec![Value::Integer(person_id)])
      .await?
      .into_iter()
      .next();
    Ok(person.map(|p| p.full_name()))
  }

  async fn movie_full_title(&self, movie_id: MovieId) -> Result<Option<String>> {
    Ok(self.get_movie(movie_id).await?.map(|m| m.full_title()))
  }

  async fn get_movie(&self, movie_id: MovieId) -> Result<Option<Movie>> {
    let sql = format!("SELECT {MOVIE_COLUMNS} FROM movie m WHERE m.movie_id = ?1");
    let movie = self
      .fetch_movies(sql, vec![Value::Integer(movie_id)])
      .await?
      .into_iter()
      .next();
    Ok(movie)
  }
}
