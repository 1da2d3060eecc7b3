//! The structured result of one [`load_all_data`](crate::load_all_data) run.

use chrono::{DateTime, Utc};
use cinedex_core::{movie::MovieKey, store::SweepOutcome};
use serde::Serialize;
use uuid::Uuid;

/// A resource line that was not ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
  pub resource: String,
  /// 1-based line number within the resource.
  pub line:     usize,
  pub content:  String,
  pub reason:   String,
}

/// An actor row whose movie never appeared in the movie resource. The person
/// was stored; no association was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedActor {
  pub first_name: String,
  pub last_name:  String,
  pub movie_key:  MovieKey,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovieWorkerReport {
  pub movies_inserted:  u64,
  pub movies_updated:   u64,
  pub persons_inserted: u64,
  pub director_links:   u64,
  /// Rows skipped under [`ParsePolicy::SkipRow`](crate::ParsePolicy::SkipRow).
  pub skipped:          Vec<SkippedRow>,
  /// The row that stopped the movie resource under
  /// [`ParsePolicy::FailFast`](crate::ParsePolicy::FailFast).
  pub stopped_at:       Option<SkippedRow>,
  pub store_failures:   u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActorWorkerReport {
  pub persons_inserted: u64,
  pub actor_links:      u64,
  pub skipped:          Vec<SkippedRow>,
  pub unmatched:        Vec<UnmatchedActor>,
  pub store_failures:   u64,
}

/// Row counts left in the store after the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub movies:       u64,
  pub persons:      u64,
  pub associations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
  pub run_id:      Uuid,
  pub started_at:  DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub movies:      MovieWorkerReport,
  pub actors:      ActorWorkerReport,
  pub sweep:       SweepOutcome,
  pub totals:      Totals,
}

impl IngestReport {
  pub(crate) fn new(
    run_id: Uuid,
    started_at: DateTime<Utc>,
    movies: MovieWorkerReport,
    actors: ActorWorkerReport,
    sweep: SweepOutcome,
  ) -> Self {
    let totals = Totals {
      movies:       movies.movies_inserted.saturating_sub(sweep.movies_deleted),
      persons:      movies.persons_inserted + actors.persons_inserted,
      associations: (movies.director_links + actors.actor_links)
        .saturating_sub(sweep.associations_deleted),
    };
    Self {
      run_id,
      started_at,
      finished_at: Utc::now(),
      movies,
      actors,
      sweep,
      totals,
    }
  }

  pub fn store_failures(&self) -> u64 {
    self.movies.store_failures + self.actors.store_failures
  }

  /// Every skipped row from both resources, movie rows first.
  pub fn skipped_rows(&self) -> impl Iterator<Item = &SkippedRow> {
    self
      .movies
      .skipped
      .iter()
      .chain(self.movies.stopped_at.iter())
      .chain(self.actors.skipped.iter())
  }
}
