//! Core types and trait definitions for the cinedex movie catalog.
//!
//! No HTTP or database dependencies live here. The store, ingestion and API
//! crates all build on the types and the two traits in [`store`].

pub mod error;
pub mod movie;
pub mod person;
pub mod row;
pub mod store;

pub use error::{Error, Result, RowError};
