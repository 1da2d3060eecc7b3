//! Handlers for `/movies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/movies` | Optional `?q=` title prefix; `limit`, `offset` |
//! | `GET`  | `/movies/{id}` | 404 if not found |
//! | `GET`  | `/movies/{id}/actors` | `limit`, `offset` |
//! | `GET`  | `/movies/{id}/title` | `{"movie_id":..,"full_title":".."}`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cinedex_core::{
  movie::{Movie, MovieId},
  person::Person,
  store::MovieCatalog,
};
use serde::Serialize;

use crate::{error::ApiError, params::ListParams};

/// A movie together with its formatted `"Title (Year) by ..."` line.
#[derive(Debug, Serialize)]
pub struct MovieView {
  #[serde(flatten)]
  pub movie:      Movie,
  pub full_title: String,
}

impl From<Movie> for MovieView {
  fn from(movie: Movie) -> Self {
    let full_title = movie.full_title();
    Self { movie, full_title }
  }
}

pub(crate) fn views(movies: Vec<Movie>) -> Vec<MovieView> {
  movies.into_iter().map(MovieView::from).collect()
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /movies[?q=<title prefix>][&limit=..][&offset=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovieView>>, ApiError>
where
  S: MovieCatalog,
{
  let page = params.page()?;
  let movies = match params.query() {
    Some(q) => store.search_movies(q, page).await,
    None => store.list_movies(page).await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(views(movies)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /movies/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<MovieId>,
) -> Result<Json<MovieView>, ApiError>
where
  S: MovieCatalog,
{
  let movie = store
    .get_movie(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("movie {id} not found")))?;
  Ok(Json(movie.into()))
}

// ─── Title ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TitleView {
  pub movie_id:   MovieId,
  pub full_title: String,
}

/// `GET /movies/{id}/title`
pub async fn title<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<MovieId>,
) -> Result<Json<TitleView>, ApiError>
where
  S: MovieCatalog,
{
  let full_title = store
    .movie_full_title(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("movie {id} not found")))?;
  Ok(Json(TitleView { movie_id: id, full_title }))
}

// ─── Cast ─────────────────────────────────────────────────────────────────────

/// `GET /movies/{id}/actors`
pub async fn actors<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<MovieId>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: MovieCatalog,
{
  let page = params.page()?;
  if store.get_movie(id).await.map_err(ApiError::store)?.is_none() {
    return Err(ApiError::NotFound(format!("movie {id} not found")));
  }
  let cast = store.actors_in_movie(id, page).await.map_err(ApiError::store)?;
  Ok(Json(cast))
}
