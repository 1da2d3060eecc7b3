//! Movie worker: parses the movie resource, stores directors and movies and
//! publishes one [`MovieReady`] per movie row.

use cinedex_core::{
  movie::{DirectorIds, MovieId},
  person::{PersonId, Role},
  row::{MOVIES_HEADER_PREFIX, MovieRow},
  store::CatalogWriter,
};

use crate::{
  ParsePolicy, Result,
  audit::AuditTrail,
  report::{MovieWorkerReport, SkippedRow},
  resource::Resource,
  worker::{MovieReady, ReadySender},
};

pub(crate) struct MovieWorker<S> {
  pub store:  S,
  pub audit:  AuditTrail,
  pub policy: ParsePolicy,
}

impl<S: CatalogWriter> MovieWorker<S> {
  pub async fn run(self, resource: Resource, tx: ReadySender) -> Result<MovieWorkerReport> {
    let mut report = MovieWorkerReport::default();
    let mut reader = resource.open().await?;

    while let Some(line) = reader.next_data_line(MOVIES_HEADER_PREFIX).await? {
      let row = match MovieRow::parse(&line.text) {
        Ok(row) => row,
        Err(e) => {
          let skipped = SkippedRow {
            resource: reader.name().to_owned(),
            line:     line.number,
            content:  line.text,
            reason:   e.to_string(),
          };
          match self.policy {
            ParsePolicy::FailFast => {
              tracing::warn!(
                line = skipped.line,
                "malformed movie row, ignoring the rest of the resource: {e}"
              );
              report.stopped_at = Some(skipped);
              break;
            }
            ParsePolicy::SkipRow => {
              tracing::warn!(line = skipped.line, "skipping malformed movie row: {e}");
              report.skipped.push(skipped);
              continue;
            }
          }
        }
      };

      if let Some(movie_id) = self.ingest(&row, &mut report).await {
        let ready = MovieReady { key: row.key(), movie_id };
        if tx.send(ready).await.is_err() {
          tracing::warn!(movie_id, "actor worker is gone, notification dropped");
        }
      }
    }
    reader.close();

    // Every permit is free again only once the actor worker has received
    // every buffered notification.
    match tx.reserve_many(tx.max_capacity()).await {
      Ok(permits) => drop(permits),
      Err(_) => tracing::debug!("notification channel already closed"),
    }
    drop(tx);

    tracing::info!(
      inserted = report.movies_inserted,
      updated = report.movies_updated,
      director_links = report.director_links,
      "movie resource done"
    );
    Ok(report)
  }

  /// Store one parsed row. `None` when the movie itself could not be stored.
  async fn ingest(&self, row: &MovieRow, report: &mut MovieWorkerReport) -> Option<MovieId> {
    let mut ids = Vec::with_capacity(row.directors.len());
    for name in &row.directors {
      match self.store.insert_person_if_not_exists(name.clone()).await {
        Ok(person) => {
          if person.inserted {
            report.persons_inserted += 1;
            self.audit.person(person.id, name).await;
          }
          ids.push(person.id);
        }
        Err(e) => {
          tracing::error!(title = %row.title, "storing director {name} failed: {e}");
          report.store_failures += 1;
          return None;
        }
      }
    }
    let directors = DirectorIds(ids);

    let title = row.normalized_title();
    let movie = match self
      .store
      .insert_or_update_movie(title.clone(), row.title.clone(), row.year, directors.clone())
      .await
    {
      Ok(movie) => movie,
      Err(e) => {
        tracing::error!(title = %row.title, year = row.year, "storing movie failed: {e}");
        report.store_failures += 1;
        return None;
      }
    };
    if movie.inserted {
      report.movies_inserted += 1;
      self.audit.movie(movie.id, &title, row.year, &directors).await;
    } else {
      report.movies_updated += 1;
    }

    for &person_id in &directors.0 {
      self.link_director(movie.id, person_id, report).await;
    }
    Some(movie.id)
  }

  async fn link_director(
    &self,
    movie_id: MovieId,
    person_id: PersonId,
    report: &mut MovieWorkerReport,
  ) {
    match self.store.insert_association(movie_id, person_id, Role::Director).await {
      Ok(()) => {
        report.director_links += 1;
        self.audit.association(movie_id, person_id, Role::Director).await;
      }
      Err(e) => {
        tracing::error!(movie_id, person_id, "linking director failed: {e}");
        report.store_failures += 1;
      }
    }
  }
}
