//! Runtime configuration: an optional TOML file overridden by `CINEDEX_*`
//! environment variables.

use std::path::{Path, PathBuf};

use cinedex_ingest::{IngestOptions, ParsePolicy, Resource};
use serde::Deserialize;

/// Runtime configuration, deserialised from `cinedex.toml`. Every field has
/// a default, so an absent file is fine.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Movie resource on disk; the bundled one when unset.
  pub movies_path:      Option<PathBuf>,
  /// Actor resource on disk; the bundled one when unset.
  pub actors_path:      Option<PathBuf>,
  /// Where the backup files go; no backup files when unset.
  pub audit_dir:        Option<PathBuf>,
  pub parse_policy:     ParsePolicy,
  pub channel_capacity: usize,
  /// Raised to [`cinedex_ingest::MIN_CAST`] when lower.
  pub min_cast:         u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let ingest = IngestOptions::default();
    Self {
      host:             "127.0.0.1".to_owned(),
      port:             5240,
      store_path:       PathBuf::from("cinedex.db"),
      movies_path:      None,
      actors_path:      None,
      audit_dir:        None,
      parse_policy:     ingest.parse_policy,
      channel_capacity: ingest.channel_capacity,
      min_cast:         ingest.min_cast,
    }
  }
}

impl ServerConfig {
  /// Read `path` (if it exists) and layer `CINEDEX_*` variables on top.
  pub fn load(path: &Path) -> Result<Self, ::config::ConfigError> {
    ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(::config::Environment::with_prefix("CINEDEX"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn ingest_options(&self) -> IngestOptions {
    let file = |p: &Option<PathBuf>| p.as_deref().map(|p| Resource::File(expand_tilde(p)));
    IngestOptions {
      movies:           file(&self.movies_path).unwrap_or_else(Resource::bundled_movies),
      actors:           file(&self.actors_path).unwrap_or_else(Resource::bundled_actors),
      parse_policy:     self.parse_policy,
      channel_capacity: self.channel_capacity,
      min_cast:         self.min_cast,
      audit_dir:        self.audit_dir.as_deref().map(expand_tilde),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.address(), "127.0.0.1:5240");
    assert_eq!(cfg.min_cast, 2);
    assert_eq!(cfg.parse_policy, ParsePolicy::FailFast);
  }

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "port = 9000\nparse_policy = \"skip_row\"\nmovies_path = \"/data/movies.txt\"\nmin_cast = 3"
    )
    .unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");

    let opts = cfg.ingest_options();
    assert_eq!(opts.parse_policy, ParsePolicy::SkipRow);
    assert_eq!(opts.min_cast, 3);
    assert!(matches!(opts.movies, Resource::File(ref p) if p == Path::new("/data/movies.txt")));
    assert!(matches!(opts.actors, Resource::Bundled { .. }));
    assert!(opts.audit_dir.is_none());
  }

  #[test]
  fn tilde_expansion() {
    let plain = Path::new("/var/lib/cinedex.db");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/c.db")), PathBuf::from(home).join("c.db"));
    }
  }
}
