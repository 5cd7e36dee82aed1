//! Full-text search infrastructure for documentation entries.
//!
//! This module provides BM25 search over document names and prefixes,
//! including tokenization, indexing, artifact loading and query execution.

pub(crate) mod index;
pub(crate) mod provider;
pub(crate) mod query;
pub(crate) mod tokenize;

pub use index::{INDEX_FORMAT_VERSION, Match, NAME_BOOST, PREFIX_BOOST, SearchIndex};
pub use provider::{AcquiredIndex, ArtifactSource, FileArtifact, IndexOrigin, IndexProvider};
pub use query::QueryEngine;
