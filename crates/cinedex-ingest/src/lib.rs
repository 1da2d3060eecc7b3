//! Ingestion pipeline: seeds the catalog from the movie and actor resources.
//!
//! Two workers run concurrently. The movie worker inserts movies and
//! publishes a [`MovieReady`](worker::MovieReady) notification per row; the
//! actor worker links actors to movies as soon as it has seen the matching
//! notification, parking rows on a wait-list until then. When both have
//! finished, an integrity sweep removes movies with too small a cast.
//!
//! The entry point is [`load_all_data`].

mod actor_worker;
mod movie_worker;
mod pipeline;

pub mod audit;
pub mod error;
pub mod report;
pub mod resource;
pub mod worker;

pub use error::{Error, Result};
pub use pipeline::{IngestOptions, MIN_CAST, ParsePolicy, load_all_data};
pub use report::IngestReport;
pub use resource::Resource;
