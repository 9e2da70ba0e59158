//! Filesystem backend for the image blob store.
//!
//! Blobs live as flat files in a root directory. Writes land in a `.staging`
//! sub-directory first and are published with a rename, which is atomic
//! because both directories share a filesystem.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{FsBlobStore, STAGING_DIR};
