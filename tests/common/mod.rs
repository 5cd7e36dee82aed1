//! Shared test fixtures and utilities for integration tests.
//!
//! Each test gets a fresh site directory laid out like a documentation build:
//! a document store under `_static/search/documents.json` and, depending on the
//! fixture, a precomputed index next to it.
//!
//! # Available Fixtures
//!
//! - `site`: documents only (no artifact, so the index is built on the fly)
//! - `indexed_site`: documents plus a matching precomputed index

use docsearch::config::{DEFAULT_ARTIFACT_PATH, DEFAULT_DOCUMENTS_PATH};
use docsearch::{DocumentEntry, DocumentStore, SearchIndex};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary site directory for test isolation, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempSite {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempSite {
    /// Creates a new empty temporary site, routing crate logs to the test writer.
    pub fn new() -> Self {
        docsearch::tracing::init(false);
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this site.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content, creating parent directories as needed.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: impl AsRef<[u8]>) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Writes the document store in its JSON form.
    pub fn write_documents(&self, store: &DocumentStore) {
        let json = store.to_json().expect("Failed to serialize documents");
        self.create_file(DEFAULT_DOCUMENTS_PATH, json);
    }

    /// Writes a precomputed index artifact built from `store`.
    pub fn write_artifact(&self, store: &DocumentStore) {
        let bytes = SearchIndex::build(store)
            .to_artifact()
            .expect("Failed to serialize index");
        self.create_file(DEFAULT_ARTIFACT_PATH, bytes);
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.root.join(DEFAULT_ARTIFACT_PATH)
    }
}

/// Creates a document entry shaped like the output of a Python API build.
#[allow(dead_code)]
pub fn doc(reference: &str, name: &str, prefix: &str, objtype: &str) -> DocumentEntry {
    let last_prefix = prefix.rsplit('.').next().unwrap_or_default();
    let displayname = match objtype {
        "py:method" => format!("{}.{}", last_prefix, name),
        "" => name.to_string(),
        _ => format!("{}.{}", prefix, name),
    };
    DocumentEntry {
        reference: reference.to_string(),
        name: name.to_string(),
        prefix: prefix.to_string(),
        objtype: objtype.to_string(),
        filename: format!("api/{}", prefix.split('.').next().unwrap_or(prefix)),
        displayname,
        shortanchor: if objtype.is_empty() {
            String::new()
        } else {
            format!("{}.{}", prefix, name)
        },
        last_prefix: last_prefix.to_string(),
    }
}

/// A small API reference: a class with several methods, module functions and section titles.
#[allow(dead_code)]
pub fn sample_store() -> DocumentStore {
    DocumentStore::from_entries([
        doc("0", "Client", "httpkit", "py:class"),
        doc("1", "get", "httpkit.Client", "py:method"),
        doc("2", "post", "httpkit.Client", "py:method"),
        doc("3", "request", "httpkit.Client", "py:method"),
        doc("4", "request", "httpkit", "py:function"),
        doc("5", "Response", "httpkit", "py:class"),
        doc("6", "status", "httpkit.Response", "py:attribute"),
        doc("7", "Session", "httpkit.sessions", "py:class"),
        doc("8", "request", "httpkit.Session", "py:method"),
        doc("9", "Quickstart", "quickstart", ""),
        doc("10", "Making Requests", "request", ""),
        doc("11", "Timeouts & Retries", "retri", ""),
    ])
}

/// Site with documents only.
#[fixture]
pub fn site() -> TempSite {
    let site = TempSite::new();
    site.write_documents(&sample_store());
    site
}

/// Site with documents and a matching precomputed index.
#[fixture]
pub fn indexed_site() -> TempSite {
    let site = TempSite::new();
    let store = sample_store();
    site.write_documents(&store);
    site.write_artifact(&store);
    site
}
