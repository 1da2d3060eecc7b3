//! HTTP application and CLI helpers behind the `cinedex` binary.
//!
//! The read API from [`cinedex_api`] is nested under `/api`; `/health`
//! answers liveness probes.

pub mod config;

use std::{fmt::Write as _, sync::Arc};

use axum::{Json, Router, routing::get};
use cinedex_core::store::MovieCatalog;
use cinedex_ingest::IngestReport;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: MovieCatalog + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", cinedex_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Reporting ────────────────────────────────────────────────────────────────

/// Human-readable summary of an ingestion run, one fact per line.
pub fn summary(report: &IngestReport) -> String {
  let mut out = String::new();
  let elapsed = report.finished_at - report.started_at;
  let _ = writeln!(
    out,
    "run {} finished in {} ms",
    report.run_id,
    elapsed.num_milliseconds()
  );
  let _ = writeln!(
    out,
    "stored {} movies, {} persons, {} associations",
    report.totals.movies, report.totals.persons, report.totals.associations
  );
  let _ = writeln!(
    out,
    "swept {} movies with too small a cast ({} associations)",
    report.sweep.movies_deleted, report.sweep.associations_deleted
  );
  if let Some(stop) = &report.movies.stopped_at {
    let _ = writeln!(
      out,
      "stopped reading {} at line {}: {}",
      stop.resource, stop.line, stop.reason
    );
  }
  for row in report.movies.skipped.iter().chain(&report.actors.skipped) {
    let _ = writeln!(out, "skipped {}:{}: {}", row.resource, row.line, row.reason);
  }
  for actor in &report.actors.unmatched {
    let _ = writeln!(
      out,
      "unmatched actor {} {} (movie {})",
      actor.first_name, actor.last_name, actor.movie_key
    );
  }
  if report.store_failures() > 0 {
    let _ = writeln!(out, "{} store writes failed", report.store_failures());
  }
  out
}
