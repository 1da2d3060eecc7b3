//! Read-only JSON API for cinedex.
//!
//! Exposes an axum [`Router`] backed by any
//! [`cinedex_core::store::MovieCatalog`]. Every route is a `GET`; list
//! routes take `limit`/`offset` and an optional `q` prefix search.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cinedex_api::api_router(Arc::new(store)))
//! ```

pub mod error;
pub mod movies;
pub mod params;
pub mod people;

use std::sync::Arc;

use axum::{Router, routing::get};
use cinedex_core::store::MovieCatalog;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MovieCatalog + 'static,
{
  Router::new()
    // Movies
    .route("/movies", get(movies::list::<S>))
    .route("/movies/{id}", get(movies::get_one::<S>))
    .route("/movies/{id}/actors", get(movies::actors::<S>))
    .route("/movies/{id}/title", get(movies::title::<S>))
    // People
    .route("/directors", get(people::list_directors::<S>))
    .route("/directors/{id}/movies", get(people::director_movies::<S>))
    .route("/actors", get(people::list_actors::<S>))
    .route("/actors/{id}/movies", get(people::actor_movies::<S>))
    .route("/persons/{id}", get(people::get_person::<S>))
    .with_state(store)
}
