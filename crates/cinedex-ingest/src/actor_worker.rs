//! Actor worker: links actors to movies as their [`MovieReady`]
//! notifications arrive.
//!
//! Rows whose movie is not known yet wait in a per-key list. The wait-list
//! and the key→id map belong to this task alone.

use std::collections::HashMap;

use cinedex_core::{
  movie::{MovieId, MovieKey},
  person::{PersonId, PersonName, Role},
  row::{ACTORS_HEADER_PREFIX, ActorRow},
  store::CatalogWriter,
};
use tokio::sync::mpsc::error::TryRecvError;

use crate::{
  Result,
  audit::AuditTrail,
  report::{ActorWorkerReport, SkippedRow, UnmatchedActor},
  resource::{NumberedLine, Resource},
  worker::{MovieReady, ReadyReceiver},
};

pub(crate) struct ActorWorker<S> {
  store:    S,
  audit:    AuditTrail,
  resolved: HashMap<MovieKey, MovieId>,
  waiting:  HashMap<MovieKey, Vec<ActorRow>>,
  report:   ActorWorkerReport,
}

impl<S: CatalogWriter> ActorWorker<S> {
  pub fn new(store: S, audit: AuditTrail) -> Self {
    Self {
      store,
      audit,
      resolved: HashMap::new(),
      waiting: HashMap::new(),
      report: ActorWorkerReport::default(),
    }
  }

  pub async fn run(
    mut self,
    resource: Resource,
    mut rx: ReadyReceiver,
  ) -> Result<ActorWorkerReport> {
    let mut reader = resource.open().await?;
    let mut lines_left = true;

    loop {
      // Take whatever is already buffered before touching the next line.
      loop {
        match rx.try_recv() {
          Ok(ready) => self.on_ready(ready).await,
          Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
      }

      if lines_left {
        match reader.next_data_line(ACTORS_HEADER_PREFIX).await? {
          Some(line) => self.on_line(reader.name(), line).await,
          None => lines_left = false,
        }
        continue;
      }

      // Lines are exhausted; only notifications can make progress now.
      match rx.recv().await {
        Some(ready) => self.on_ready(ready).await,
        None => break,
      }
    }
    reader.close();

    self.finish_unmatched().await;
    tracing::info!(
      actor_links = self.report.actor_links,
      unmatched = self.report.unmatched.len(),
      skipped = self.report.skipped.len(),
      "actor resource done"
    );
    Ok(self.report)
  }

  async fn on_ready(&mut self, ready: MovieReady) {
    let pending = self.waiting.remove(&ready.key).unwrap_or_default();
    if !pending.is_empty() {
      tracing::debug!(key = %ready.key, count = pending.len(), "releasing waiting actors");
    }
    self.resolved.insert(ready.key, ready.movie_id);
    for row in pending {
      self.link(&row, ready.movie_id).await;
    }
  }

  async fn on_line(&mut self, resource: &str, line: NumberedLine) {
    let row = match ActorRow::parse(&line.text) {
      Ok(row) => row,
      Err(e) => {
        tracing::warn!(line = line.number, "skipping malformed actor row: {e}");
        self.report.skipped.push(SkippedRow {
          resource: resource.to_owned(),
          line:     line.number,
          content:  line.text,
          reason:   e.to_string(),
        });
        return;
      }
    };

    let key = row.key();
    match self.resolved.get(&key) {
      Some(&movie_id) => self.link(&row, movie_id).await,
      None => self.waiting.entry(key).or_default().push(row),
    }
  }

  async fn link(&mut self, row: &ActorRow, movie_id: MovieId) {
    let Some(person_id) = self.resolve_person(&row.actor).await else {
      return;
    };
    match self.store.insert_association(movie_id, person_id, Role::Actor).await {
      Ok(()) => {
        self.report.actor_links += 1;
        self.audit.association(movie_id, person_id, Role::Actor).await;
      }
      Err(e) => {
        tracing::error!(movie_id, person_id, "linking actor failed: {e}");
        self.report.store_failures += 1;
      }
    }
  }

  async fn resolve_person(&mut self, name: &PersonName) -> Option<PersonId> {
    match self.store.insert_person_if_not_exists(name.clone()).await {
      Ok(person) => {
        if person.inserted {
          self.report.persons_inserted += 1;
          self.audit.person(person.id, name).await;
        }
        Some(person.id)
      }
      Err(e) => {
        tracing::error!("storing actor {name} failed: {e}");
        self.report.store_failures += 1;
        None
      }
    }
  }

  /// The channel is closed, so anything still waiting references a movie
  /// that was never produced. Store the person, skip the link.
  async fn finish_unmatched(&mut self) {
    let mut leftover: Vec<_> = self.waiting.drain().collect();
    leftover.sort_by(|a, b| a.0.cmp(&b.0));

    for (key, rows) in leftover {
      for row in rows {
        tracing::warn!(movie_key = %key, "no movie for actor {}", row.actor);
        self.resolve_person(&row.actor).await;
        self.report.unmatched.push(UnmatchedActor {
          first_name: row.actor.first.clone(),
          last_name:  row.actor.last.clone(),
          movie_key:  key.clone(),
        });
      }
    }
  }
}
