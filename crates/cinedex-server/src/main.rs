//! `cinedex` binary.
//!
//! Reads `cinedex.toml` (or the path given with `--config`), opens the
//! SQLite store and either loads the catalog from the movie and actor
//! resources or serves the read API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use cinedex_core::store::{MovieCatalog, Page};
use cinedex_ingest::load_all_data;
use cinedex_server::ServerConfig;
use cinedex_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "cinedex movie catalog")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "cinedex.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Clear the store and ingest the movie and actor resources.
  Load {
    /// Print the full ingestion report as JSON instead of a summary.
    #[arg(long)]
    json: bool,
  },
  /// Serve the read-only JSON API.
  Serve {
    /// Reload the catalog before accepting requests.
    #[arg(long)]
    reload: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config from {:?}", cli.config))?;

  let store_path = cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Load { json } => {
      let report = load_all_data(&store, cfg.ingest_options())
        .await
        .context("ingestion failed")?;
      if json {
        let out = serde_json::to_string_pretty(&report)
          .context("failed to serialise ingestion report")?;
        println!("{out}");
      } else {
        print!("{}", cinedex_server::summary(&report));
      }
    }
    Command::Serve { reload } => {
      if reload {
        load_all_data(&store, cfg.ingest_options())
          .await
          .context("ingestion failed")?;
      } else if store
        .list_movies(Page::new(1, 0))
        .await
        .context("failed to read catalog")?
        .is_empty()
      {
        tracing::warn!("catalog is empty; run `cinedex load` or pass --reload");
      }

      let app = cinedex_server::router(Arc::new(store));
      let address = cfg.address();

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}
