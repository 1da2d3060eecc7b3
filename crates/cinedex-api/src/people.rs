//! Handlers for `/directors`, `/actors` and `/persons`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/directors` | Optional `?q=` name search; `limit`, `offset` |
//! | `GET`  | `/directors/{id}/movies` | Movies the person directed |
//! | `GET`  | `/actors` | Optional `?q=` name search; `limit`, `offset` |
//! | `GET`  | `/actors/{id}/movies` | Movies the person acted in |
//! | `GET`  | `/persons/{id}` | `{"person_id":..,"name":".."}`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cinedex_core::{
  person::{Person, PersonId},
  store::MovieCatalog,
};
use serde::Serialize;

use crate::{
  error::ApiError,
  movies::{MovieView, views},
  params::ListParams,
};

async fn ensure_person<S: MovieCatalog>(store: &S, id: PersonId) -> Result<String, ApiError> {
  store
    .person_name(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))
}

// ─── Directors ────────────────────────────────────────────────────────────────

/// `GET /directors[?q=<name>][&limit=..][&offset=..]`
pub async fn list_directors<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: MovieCatalog,
{
  let page = params.page()?;
  let people = match params.query() {
    Some(q) => store.search_directors(q, page).await,
    None => store.list_directors(page).await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(people))
}

/// `GET /directors/{id}/movies`
pub async fn director_movies<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovieView>>, ApiError>
where
  S: MovieCatalog,
{
  let page = params.page()?;
  ensure_person(store.as_ref(), id).await?;
  let movies = store.movies_by_director(id, page).await.map_err(ApiError::store)?;
  Ok(Json(views(movies)))
}

// ─── Actors ───────────────────────────────────────────────────────────────────

/// `GET /actors[?q=<name>][&limit=..][&offset=..]`
pub async fn list_actors<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: MovieCatalog,
{
  let page = params.page()?;
  let people = match params.query() {
    Some(q) => store.search_actors(q, page).await,
    None => store.list_actors(page).await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(people))
}

/// `GET /actors/{id}/movies`
pub async fn actor_movies<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovieView>>, ApiError>
where
  S: MovieCatalog,
{
  let page = params.page()?;
  ensure_person(store.as_ref(), id).await?;
  let movies = store.movies_with_actor(id, page).await.map_err(ApiError::store)?;
  Ok(Json(views(movies)))
}

// ─── Persons ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PersonView {
  pub person_id: PersonId,
  pub name:      String,
}

/// `GET /persons/{id}`
pub async fn get_person<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<PersonView>, ApiError>
where
  S: MovieCatalog,
{
  let name = ensure_person(store.as_ref(), id).await?;
  Ok(Json(PersonView { person_id: id, name }))
}
