//! The `load_all_data` orchestrator.

use std::path::PathBuf;

use chrono::Utc;
use cinedex_core::store::CatalogWriter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  actor_worker::ActorWorker,
  audit::AuditTrail,
  movie_worker::MovieWorker,
  report::IngestReport,
  resource::Resource,
};

/// Smallest cast a movie may keep after ingestion. Lower settings are raised
/// to this.
pub const MIN_CAST: u32 = 2;

/// What the movie worker does with a row it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
  /// Stop reading the movie resource at the first malformed row.
  #[default]
  FailFast,
  /// Record the row in the report and carry on.
  SkipRow,
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
  pub movies:           Resource,
  pub actors:           Resource,
  pub parse_policy:     ParsePolicy,
  /// Buffer size of the movie→actor notification channel. Clamped to 1.
  pub channel_capacity: usize,
  /// Movies with fewer actor links than this are removed by the sweep.
  /// Never below [`MIN_CAST`].
  pub min_cast:         u32,
  /// Directory for the backup files; `None` disables them.
  pub audit_dir:        Option<PathBuf>,
}

impl Default for IngestOptions {
  fn default() -> Self {
    Self {
      movies:           Resource::bundled_movies(),
      actors:           Resource::bundled_actors(),
      parse_policy:     ParsePolicy::default(),
      channel_capacity: 64,
      min_cast:         MIN_CAST,
      audit_dir:        None,
    }
  }
}

impl IngestOptions {
  pub fn with_resources(movies: Resource, actors: Resource) -> Self {
    Self { movies, actors, ..Self::default() }
  }
}

/// Clear the store, ingest both resources concurrently and run the integrity
/// sweep. Returns once everything has finished.
///
/// Per-row problems never fail the run; they end up in the report. Errors
/// are reserved for unreadable resources, an unusable store (reset or sweep
/// failing) and panicking workers.
pub async fn load_all_data<S>(store: &S, options: IngestOptions) -> Result<IngestReport>
where
  S: CatalogWriter + Clone + 'static,
{
  let run_id = Uuid::new_v4();
  run(store, options, run_id)
    .instrument(tracing::info_span!("load_all_data", %run_id))
    .await
}

async fn run<S>(store: &S, options: IngestOptions, run_id: Uuid) -> Result<IngestReport>
where
  S: CatalogWriter + Clone + 'static,
{
  let started_at = Utc::now();
  tracing::info!(
    movies = %options.movies.name(),
    actors = %options.actors.name(),
    policy = ?options.parse_policy,
    "starting ingestion"
  );

  store.reset().await.map_err(Error::store)?;

  let audit = match &options.audit_dir {
    Some(dir) => AuditTrail::open(dir).await?,
    None => AuditTrail::disabled(),
  };

  let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));

  let movie_worker = MovieWorker {
    store:  store.clone(),
    audit:  audit.clone(),
    policy: options.parse_policy,
  };
  let actor_worker = ActorWorker::new(store.clone(), audit.clone());

  let movies = tokio::spawn(
    movie_worker
      .run(options.movies, tx)
      .instrument(tracing::info_span!("movie_worker")),
  );
  let actors = tokio::spawn(
    actor_worker
      .run(options.actors, rx)
      .instrument(tracing::info_span!("actor_worker")),
  );
  let (movies, actors) = tokio::join!(movies, actors);
  let (movies, actors) = (movies??, actors??);

  if options.min_cast < MIN_CAST {
    tracing::warn!(
      configured = options.min_cast,
      "min_cast below {MIN_CAST}; using {MIN_CAST}"
    );
  }
  let sweep = store
    .sweep_undercast_movies(options.min_cast.max(MIN_CAST))
    .await
    .map_err(Error::store)?;
  audit.flush().await;

  let report = IngestReport::new(run_id, started_at, movies, actors, sweep);
  tracing::info!(
    movies = report.totals.movies,
    persons = report.totals.persons,
    associations = report.totals.associations,
    skipped = report.skipped_rows().count(),
    unmatched = report.actors.unmatched.len(),
    store_failures = report.store_failures(),
    "ingestion finished"
  );
  Ok(report)
}
