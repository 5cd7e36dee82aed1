//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for docsearch operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at I/O boundaries.
pub type Result<T> = anyhow::Result<T>;

/// Reasons a precomputed index artifact could not be used.
///
/// Every variant is recovered by building the index from the document store,
/// so these never reach the user; they only show up in traces.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// No artifact at the expected location.
    #[error("index artifact not found at {}", path.display())]
    Missing { path: PathBuf },
    /// The artifact exists but could not be read.
    #[error("failed to read index artifact: {0}")]
    Io(#[from] std::io::Error),
    /// The artifact bytes are not a serialized index.
    #[error("index artifact is corrupt: {0}")]
    Corrupt(#[from] postcard::Error),
    /// The artifact was written by an incompatible format revision.
    #[error("index artifact has format version {found}, expected {expected}")]
    UnsupportedVersion { expected: u32, found: u32 },
    /// The artifact was built from different document data than the current store.
    #[error("index artifact is stale (built for store {found:016x}, current store {expected:016x})")]
    Stale { expected: u64, found: u64 },
}

/// Error returned when loading or converting document data fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read document data at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse document data: {0}")]
    Parse(#[from] serde_json::Error),
    /// An entry's `ref` field disagrees with the key it is stored under.
    #[error("document keyed '{key}' declares ref '{declared}'")]
    RefMismatch { key: String, declared: String },
    /// Search data references a document or object type index that does not exist.
    #[error("search data references missing {what} #{index}")]
    DanglingIndex { what: &'static str, index: usize },
}

/// Error returned when the site configuration cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("results.limit must be at least 1")]
    ZeroLimit,
}
