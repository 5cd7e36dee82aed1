//! Index acquisition: load the precomputed artifact, or build from the document store.

use crate::error::AcquireError;
use crate::store::DocumentStore;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use super::index::SearchIndex;

/// Where an artifact's bytes come from.
pub trait ArtifactSource {
    /// Fetches the raw artifact. `io::ErrorKind::NotFound` means there is none.
    fn fetch(&self) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    /// Human-readable location for traces.
    fn describe(&self) -> String;
}

/// Artifact stored as a file, usually `<site>/_static/search/docindex.bin`.
#[derive(Debug, Clone)]
pub struct FileArtifact {
    path: PathBuf,
}

impl FileArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for FileArtifact {
    fn fetch(&self) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        tokio::fs::read(self.path.clone())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Which branch produced the active index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    Precomputed,
    Built,
}

/// A settled index, ready to serve queries.
#[derive(Debug, Clone)]
pub struct AcquiredIndex {
    pub index: Arc<SearchIndex>,
    pub origin: IndexOrigin,
}

/// Acquires the search index for a document store.
#[derive(Debug, Clone)]
pub struct IndexProvider<S> {
    source: S,
}

impl<S: ArtifactSource> IndexProvider<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns a ready index: the precomputed artifact when usable, otherwise one built from `store`.
    ///
    /// Never fails; artifact problems are traced and recovered by building.
    pub async fn acquire(&self, store: &Arc<DocumentStore>) -> AcquiredIndex {
        match self.load_precomputed(store).await {
            Ok(index) => {
                tracing::info!(
                    "Pre-generated search index loaded from {} ({} terms, {} docs)",
                    self.source.describe(),
                    index.term_count(),
                    index.document_count()
                );
                AcquiredIndex {
                    index: Arc::new(index),
                    origin: IndexOrigin::Precomputed,
                }
            }
            Err(e) => {
                match &e {
                    AcquireError::Missing { .. } => tracing::info!("{}; building index on the fly", e),
                    _ => tracing::warn!("Could not load pre-generated search index ({}); building index on the fly", e),
                }
                AcquiredIndex {
                    index: Arc::new(build_index(store).await),
                    origin: IndexOrigin::Built,
                }
            }
        }
    }

    /// Fetches and decodes the artifact, verifying it matches `store`.
    pub async fn load_precomputed(
        &self,
        store: &Arc<DocumentStore>,
    ) -> Result<SearchIndex, AcquireError> {
        let bytes = self.source.fetch().await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                AcquireError::Missing {
                    path: PathBuf::from(self.source.describe()),
                }
            } else {
                AcquireError::Io(e)
            }
        })?;

        let store = Arc::clone(store);
        // Deserialize in spawn_blocking since it's CPU intensive
        tokio::task::spawn_blocking(move || SearchIndex::from_artifact(&bytes, &store))
            .await
            .map_err(|e| AcquireError::Io(io::Error::other(e)))?
    }
}

/// Builds the index from the store off the async worker threads.
async fn build_index(store: &Arc<DocumentStore>) -> SearchIndex {
    let owned = Arc::clone(store);
    match tokio::task::spawn_blocking(move || SearchIndex::build(&owned)).await {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!("Index build task failed ({}), building inline", e);
            SearchIndex::build(store)
        }
    }
}
