//! Core types and trait definitions for the Cabai classification API.
//!
//! This crate holds the record model, input validation, the [`RecordStore`]
//! and [`BlobStore`] abstractions, and the two services composed on top of
//! them: the [`Ingestor`] and the [`QueryService`]. It has no HTTP or database
//! dependencies.
//!
//! [`RecordStore`]: store::RecordStore
//! [`BlobStore`]: blob::BlobStore
//! [`Ingestor`]: ingest::Ingestor
//! [`QueryService`]: query::QueryService

pub mod blob;
pub mod error;
pub mod ingest;
pub mod query;
pub mod record;
pub mod store;
pub mod sweep;
pub mod validate;

pub use error::{Error, Result, ValidationError};

#[cfg(test)]
mod testing;
