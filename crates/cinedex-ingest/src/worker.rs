//! Types shared by the two ingestion workers.

use cinedex_core::movie::{MovieId, MovieKey};
use tokio::sync::mpsc;

/// "This movie row is committed": published by the movie worker once per
/// movie row, consumed by the actor worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieReady {
  pub key:      MovieKey,
  pub movie_id: MovieId,
}

pub(crate) type ReadySender = mpsc::Sender<MovieReady>;
pub(crate) type ReadyReceiver = mpsc::Receiver<MovieReady>;
