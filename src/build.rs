//! Build-time precomputation of the search artifact.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::search::SearchIndex;
use crate::sphinx;
use crate::store::DocumentStore;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// What a build wrote.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub documents: usize,
    pub terms: usize,
    /// Set when the document store was (re)written from Sphinx data.
    pub documents_path: Option<PathBuf>,
    pub artifact_path: PathBuf,
}

/// Writes the site's precomputed index.
///
/// With `sphinx_data`, the Sphinx search data is converted and written as the
/// site's document store first; otherwise the existing store is indexed.
pub async fn build_site_index(
    site: &Path,
    config: &SiteConfig,
    sphinx_data: Option<&Path>,
) -> Result<BuildSummary> {
    let documents_path = config.documents_path(site);

    let (store, written) = match sphinx_data {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read Sphinx search data at {}", path.display()))?;
            let store = sphinx::convert(&content)?;
            write_documents(&store, &documents_path).await?;
            (store, Some(documents_path))
        }
        None => (DocumentStore::load(&documents_path).await?, None),
    };

    tracing::info!("Pre-building search index for {} documents", store.len());
    let index = tokio::task::spawn_blocking(move || SearchIndex::build(&store))
        .await
        .context("Index build task panicked")?;

    let artifact_path = config.artifact_path(site);
    index.write_artifact(&artifact_path).await?;

    Ok(BuildSummary {
        documents: index.document_count(),
        terms: index.term_count(),
        documents_path: written,
        artifact_path,
    })
}

async fn write_documents(store: &DocumentStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = store.to_json().context("Failed to serialize documents")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write documents to {}", path.display()))?;
    tracing::info!("Wrote {} documents to {}", store.len(), path.display());
    Ok(())
}
