//! Append-only backup files: one human-readable line per inserted row.
//!
//! Nothing reads these back. A failed write is logged and otherwise ignored
//! so the audit trail can never stop an ingestion run.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use cinedex_core::{
  movie::{DirectorIds, MovieId},
  person::{PersonId, PersonName, Role},
};
use tokio::{
  fs::{File, OpenOptions},
  io::{AsyncWriteExt as _, BufWriter},
  sync::Mutex,
};

use crate::{Error, Result};

pub const MOVIES_FILE: &str = "movies_output.txt";
pub const PERSONS_FILE: &str = "persons_output.txt";
pub const ASSOCIATIONS_FILE: &str = "movie_person_output.txt";

const MOVIES_HEADER: &str = "id,title,year,director_ids";
const PERSONS_HEADER: &str = "id,first_name,last_name";
const ASSOCIATIONS_HEADER: &str = "movie_id,person_id,role";

// ─── AuditFile ───────────────────────────────────────────────────────────────

struct AuditFile {
  path:   PathBuf,
  writer: Mutex<BufWriter<File>>,
}

impl AuditFile {
  async fn open(dir: &Path, name: &str, header: &str) -> Result<Self> {
    let path = dir.join(name);
    let file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&path)
      .await
      .map_err(|source| Error::Audit { path: path.clone(), source })?;
    let audit = Self { path, writer: Mutex::new(BufWriter::new(file)) };
    audit.append(header).await;
    Ok(audit)
  }

  async fn append(&self, line: &str) {
    let mut writer = self.writer.lock().await;
    let result = async {
      writer.write_all(line.as_bytes()).await?;
      writer.write_all(b"\n").await
    }
    .await;
    if let Err(e) = result {
      tracing::warn!(path = ?self.path, "audit write failed: {e}");
    }
  }

  async fn flush(&self) {
    if let Err(e) = self.writer.lock().await.flush().await {
      tracing::warn!(path = ?self.path, "audit flush failed: {e}");
    }
  }
}

struct AuditFiles {
  movies:       AuditFile,
  persons:      AuditFile,
  associations: AuditFile,
}

// ─── AuditTrail ──────────────────────────────────────────────────────────────

/// Shared handle to the three backup files. Cloning shares the files; a
/// disabled trail turns every write into a no-op.
#[derive(Clone, Default)]
pub struct AuditTrail {
  inner: Option<Arc<AuditFiles>>,
}

impl AuditTrail {
  pub fn disabled() -> Self { Self::default() }

  /// Create `dir` if needed, open the three files for appending and write a
  /// header line to each.
  pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
      .await
      .map_err(|source| Error::Audit { path: dir.to_owned(), source })?;

    let files = AuditFiles {
      movies:       AuditFile::open(dir, MOVIES_FILE, MOVIES_HEADER).await?,
      persons:      AuditFile::open(dir, PERSONS_FILE, PERSONS_HEADER).await?,
      associations: AuditFile::open(dir, ASSOCIATIONS_FILE, ASSOCIATIONS_HEADER)
        .await?,
    };
    tracing::info!(dir = ?dir, "audit trail enabled");
    Ok(Self { inner: Some(Arc::new(files)) })
  }

  pub async fn movie(
    &self,
    movie_id: MovieId,
    title: &str,
    year: i32,
    directors: &DirectorIds,
  ) {
    if let Some(files) = &self.inner {
      files
        .movies
        .append(&format!("{movie_id},{title},{year},{directors}"))
        .await;
    }
  }

  pub async fn person(&self, person_id: PersonId, name: &PersonName) {
    if let Some(files) = &self.inner {
      files
        .persons
        .append(&format!("{person_id},{},{}", name.first, name.last))
        .await;
    }
  }

  pub async fn association(&self, movie_id: MovieId, person_id: PersonId, role: Role) {
    if let Some(files) = &self.inner {
      files
        .associations
        .append(&format!("{movie_id},{person_id},{}", role.marker()))
        .await;
    }
  }

  pub async fn flush(&self) {
    if let Some(files) = &self.inner {
      files.movies.flush().await;
      files.persons.flush().await;
      files.associations.flush().await;
    }
  }
}
