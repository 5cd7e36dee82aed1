//! Inverted index over document names and prefixes, with a portable artifact format.

use crate::error::AcquireError;
use crate::store::{DocumentEntry, DocumentStore};
use postcard::{take_from_bytes, to_io};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

use super::tokenize::{TermBuilder, TermHash, hash_term, tokenize_and_stem};

/// Revision of the serialized artifact layout. Bump on any change to [`SearchIndex`].
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Weight of a `name` hit relative to a `prefix` hit.
pub const NAME_BOOST: f32 = 10.0;
pub const PREFIX_BOOST: f32 = 1.0;

pub(crate) const FIELD_COUNT: usize = 2;

/// Indexed document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Name = 0,
    Prefix = 1,
}

pub(crate) const FIELDS: [Field; FIELD_COUNT] = [Field::Name, Field::Prefix];

impl Field {
    pub(crate) const fn boost(self) -> f32 {
        match self {
            Self::Name => NAME_BOOST,
            Self::Prefix => PREFIX_BOOST,
        }
    }

    pub(crate) fn text(self, entry: &DocumentEntry) -> &str {
        match self {
            Self::Name => &entry.name,
            Self::Prefix => &entry.prefix,
        }
    }
}

/// A single index hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    #[serde(rename = "ref")]
    pub reference: String,
    pub score: f32,
}

/// A searchable term index with BM25 scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Fingerprint of the document store this index was built from
    store_fingerprint: u64,
    /// Map from term hash to (document position, score) pairs, sorted by score descending
    terms: HashMap<TermHash, Vec<(u32, f32)>>,
    /// Map from document position to ref
    refs: Vec<String>,
}

impl SearchIndex {
    pub(super) fn new(
        store_fingerprint: u64,
        terms: HashMap<TermHash, Vec<(u32, f32)>>,
        refs: Vec<String>,
    ) -> Self {
        Self {
            store_fingerprint,
            terms,
            refs,
        }
    }

    /// Indexes every entry of the store, `name` boosted over `prefix`.
    pub fn build(store: &DocumentStore) -> Self {
        let mut builder = TermBuilder::default();
        for entry in store {
            builder.add_document(entry);
        }
        builder.finalize(store.fingerprint())
    }

    /// Searches for documents matching the query text.
    /// Returns every hit sorted by relevance score (highest first, build order on ties).
    ///
    /// The query is tokenized and stemmed just like indexed terms, so:
    /// - "LoaderConfig" matches documents with "loader", "config", or "loaderconfig"
    /// - CamelCase, snake_case, dotted and hyphenated names are all handled
    pub fn search(&self, query: &str) -> Vec<Match> {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(query, &stemmer);

        if tokens.is_empty() {
            return vec![];
        }

        // Collect results from all tokens, combining scores for documents that match multiple
        let mut combined_scores: HashMap<u32, f32> = HashMap::new();

        for token in &tokens {
            if let Some(postings) = self.terms.get(&hash_term(token)) {
                for (doc, score) in postings {
                    *combined_scores.entry(*doc).or_insert(0.0) += score;
                }
            }
        }

        let mut results: Vec<_> = combined_scores.into_iter().collect();
        results.sort_by(|(da, a), (db, b)| b.total_cmp(a).then(da.cmp(db)));

        results
            .into_iter()
            .filter_map(|(doc, score)| {
                self.refs.get(doc as usize).map(|reference| Match {
                    reference: reference.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.refs.len()
    }

    pub fn store_fingerprint(&self) -> u64 {
        self.store_fingerprint
    }

    /// Decodes an artifact and checks it was built from `store`.
    pub fn from_artifact(bytes: &[u8], store: &DocumentStore) -> Result<Self, AcquireError> {
        let (version, body) = take_from_bytes::<u32>(bytes)?;
        if version != INDEX_FORMAT_VERSION {
            return Err(AcquireError::UnsupportedVersion {
                expected: INDEX_FORMAT_VERSION,
                found: version,
            });
        }

        let (index, _) = take_from_bytes::<Self>(body)?;
        let expected = store.fingerprint();
        if index.store_fingerprint != expected {
            return Err(AcquireError::Stale {
                expected,
                found: index.store_fingerprint,
            });
        }
        Ok(index)
    }

    /// Encodes the index as an artifact: format version followed by the index body.
    pub fn to_artifact(&self) -> postcard::Result<Vec<u8>> {
        postcard::to_allocvec(&(INDEX_FORMAT_VERSION, self))
    }

    /// Writes the artifact to disk, replacing any existing file.
    pub async fn write_artifact(&self, path: &Path) -> crate::error::Result<()> {
        use anyhow::Context;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let path = path.to_path_buf();
        let index = self.clone();

        // Serialize in spawn_blocking since it's CPU intensive
        tokio::task::spawn_blocking(move || -> crate::error::Result<()> {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create index file {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            to_io(&(INDEX_FORMAT_VERSION, &index), &mut writer)
                .with_context(|| format!("Failed to write search index to {}", path.display()))?;
            std::io::Write::flush(&mut writer)
                .with_context(|| format!("Failed to flush search index to {}", path.display()))?;
            tracing::debug!("Wrote search index to {}", path.display());
            Ok(())
        })
        .await
        .context("Index writing task panicked")?
    }
}
