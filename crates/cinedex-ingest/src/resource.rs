//! Line readers over the two input resources.
//!
//! A [`Resource`] names where lines come from; [`Resource::open`] yields a
//! forward-only [`LineReader`]. Restarting means opening the resource again.

use std::{io::Cursor, path::PathBuf};

use tokio::io::{AsyncBufReadExt as _, AsyncRead, BufReader, Lines};

use crate::{Error, Result};

/// Movie rows shipped with the crate.
pub const BUNDLED_MOVIES: &str = include_str!("../resources/movies.txt");
/// Actor rows shipped with the crate.
pub const BUNDLED_ACTORS: &str = include_str!("../resources/actors.txt");

// ─── Resource ────────────────────────────────────────────────────────────────

/// Where a resource's lines come from.
#[derive(Debug, Clone)]
pub enum Resource {
  /// Compiled into the binary.
  Bundled {
    name:     &'static str,
    contents: &'static str,
  },
  /// A file on disk, read lazily.
  File(PathBuf),
  /// An owned string, mostly for tests.
  Text { name: String, contents: String },
}

impl Resource {
  pub fn bundled_movies() -> Self {
    Self::Bundled { name: "movies.txt", contents: BUNDLED_MOVIES }
  }

  pub fn bundled_actors() -> Self {
    Self::Bundled { name: "actors.txt", contents: BUNDLED_ACTORS }
  }

  pub fn text(name: impl Into<String>, contents: impl Into<String>) -> Self {
    Self::Text { name: name.into(), contents: contents.into() }
  }

  pub fn name(&self) -> String {
    match self {
      Self::Bundled { name, .. } => (*name).to_owned(),
      Self::File(path) => path.display().to_string(),
      Self::Text { name, .. } => name.clone(),
    }
  }

  pub async fn open(&self) -> Result<LineReader> {
    let name = self.name();
    let source: Box<dyn AsyncRead + Send + Unpin> = match self {
      Self::Bundled { contents, .. } => Box::new(Cursor::new(contents.as_bytes())),
      Self::File(path) => {
        let file = tokio::fs::File::open(path)
          .await
          .map_err(|source| Error::Resource { name: name.clone(), source })?;
        Box::new(file)
      }
      Self::Text { contents, .. } => Box::new(Cursor::new(contents.clone().into_bytes())),
    };
    tracing::debug!(resource = %name, "opened");
    Ok(LineReader {
      name,
      lines: BufReader::new(source).lines(),
      line_number: 0,
      header_checked: false,
    })
  }
}

// ─── LineReader ──────────────────────────────────────────────────────────────

/// A lazy, forward-only sequence of lines.
pub struct LineReader {
  name:           String,
  lines:          Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>,
  line_number:    usize,
  header_checked: bool,
}

/// A non-blank line and its 1-based position in the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
  pub number: usize,
  pub text:   String,
}

impl LineReader {
  pub fn name(&self) -> &str { &self.name }

  /// The next raw line, or `None` at end of resource.
  pub async fn read_line(&mut self) -> Result<Option<String>> {
    let line = self
      .lines
      .next_line()
      .await
      .map_err(|source| Error::Resource { name: self.name.clone(), source })?;
    if line.is_some() {
      self.line_number += 1;
    }
    Ok(line)
  }

  /// The next non-blank line. The first non-blank line of the resource is
  /// dropped if it starts with `header_prefix`.
  pub async fn next_data_line(
    &mut self,
    header_prefix: &str,
  ) -> Result<Option<NumberedLine>> {
    while let Some(text) = self.read_line().await? {
      if text.trim().is_empty() {
        continue;
      }
      if !self.header_checked {
        self.header_checked = true;
        if cinedex_core::row::is_header(&text, header_prefix) {
          tracing::debug!(resource = %self.name, "skipping header");
          continue;
        }
      }
      return Ok(Some(NumberedLine { number: self.line_number, text }));
    }
    Ok(None)
  }

  pub fn close(self) {
    tracing::debug!(resource = %self.name, lines = self.line_number, "closed");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn skips_blank_lines_and_header() {
    let res = Resource::text("t", "\n  \nmovie_title,year,directors\r\nHeat,1995,Michael Mann\n\nAlien,1979,Ridley Scott");
    let mut reader = res.open().await.unwrap();

    let first = reader.next_data_line("movie_title").await.unwrap().unwrap();
    assert_eq!(first, NumberedLine { number: 4, text: "Heat,1995,Michael Mann".into() });

    let second = reader.next_data_line("movie_title").await.unwrap().unwrap();
    assert_eq!(second.number, 6);
    assert!(reader.next_data_line("movie_title").await.unwrap().is_none());
    reader.close();
  }

  #[tokio::test]
  async fn header_is_only_checked_once() {
    let res = Resource::text("t", "Heat,1995,Michael Mann\nmovie_title,2000,Some One");
    let mut reader = res.open().await.unwrap();
    assert_eq!(reader.next_data_line("movie_title").await.unwrap().unwrap().number, 1);
    assert_eq!(reader.next_data_line("movie_title").await.unwrap().unwrap().number, 2);
  }

  #[tokio::test]
  async fn reopening_restarts() {
    let res = Resource::text("t", "a\nb");
    let mut first = res.open().await.unwrap();
    first.read_line().await.unwrap();
    let mut second = res.open().await.unwrap();
    assert_eq!(second.read_line().await.unwrap().as_deref(), Some("a"));
  }

  #[tokio::test]
  async fn missing_file_is_a_resource_error() {
    let res = Resource::File("/definitely/not/here.txt".into());
    assert!(matches!(res.open().await, Err(Error::Resource { .. })));
  }

  #[test]
  fn bundled_resources_have_headers() {
    assert!(BUNDLED_MOVIES.starts_with("movie_title"));
    assert!(BUNDLED_ACTORS.starts_with("first_name"));
  }
}
