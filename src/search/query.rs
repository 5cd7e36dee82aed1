//! Query execution against a settled index.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::index::{Match, SearchIndex};

/// Runs text queries against a ready index.
///
/// Ranking is entirely the index's; the engine only remembers the most recent
/// queries so retyping or backspacing over a prefix does not search again.
pub struct QueryEngine {
    index: Arc<SearchIndex>,
    memo: Option<LruCache<String, Arc<[Match]>>>,
}

impl QueryEngine {
    /// `memo_size` of zero disables the memo.
    pub fn new(index: Arc<SearchIndex>, memo_size: usize) -> Self {
        Self {
            index,
            memo: NonZeroUsize::new(memo_size).map(LruCache::new),
        }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Returns matches in descending relevance. Queries that hit nothing return an empty slice.
    ///
    /// Callers skip empty text entirely; an empty query is "no query", not "match everything".
    pub fn search(&mut self, text: &str) -> Arc<[Match]> {
        if let Some(hit) = self.memo.as_mut().and_then(|memo| memo.get(text)) {
            tracing::trace!("Query memo hit for '{}'", text);
            return Arc::clone(hit);
        }

        let matches: Arc<[Match]> = self.index.search(text).into();
        tracing::debug!("Query '{}' matched {} documents", text, matches.len());

        if let Some(memo) = self.memo.as_mut() {
            memo.put(text.to_string(), Arc::clone(&matches));
        }
        matches
    }
}
