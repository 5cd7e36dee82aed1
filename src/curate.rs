//! Turning ranked index matches into the short list shown to the user.

use crate::search::Match;
use crate::store::{DocumentEntry, DocumentStore, PY_METHOD};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default number of suggestions shown.
pub const DEFAULT_LIMIT: usize = 5;

/// Which entry field identifies the logical destination for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupKey {
    Name,
    Prefix,
}

impl DedupKey {
    fn extract(self, entry: &DocumentEntry) -> &str {
        match self {
            Self::Name => &entry.name,
            Self::Prefix => &entry.prefix,
        }
    }
}

/// Maps object types to their dedup key; unlisted types use `name`.
///
/// Methods collapse onto their class by default, so overloads and same-named
/// methods of one class show up once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupPolicy {
    by_objtype: HashMap<String, DedupKey>,
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self {
            by_objtype: HashMap::from([(PY_METHOD.to_string(), DedupKey::Prefix)]),
        }
    }
}

impl DedupPolicy {
    /// Adds or replaces the key used for `objtype`.
    pub fn with(mut self, objtype: impl Into<String>, key: DedupKey) -> Self {
        self.by_objtype.insert(objtype.into(), key);
        self
    }

    pub fn key_for(&self, objtype: &str) -> DedupKey {
        self.by_objtype.get(objtype).copied().unwrap_or(DedupKey::Name)
    }

    /// The value two entries must share to count as the same destination.
    pub fn dedup_value<'a>(&self, entry: &'a DocumentEntry) -> &'a str {
        self.key_for(&entry.objtype).extract(entry)
    }
}

/// Resolves matches against the store, dropping duplicates and keeping at most `limit`.
///
/// Matches are walked in relevance order. Skipped duplicates and unknown refs
/// do not count against the limit.
pub fn curate<'s>(
    matches: &[Match],
    store: &'s DocumentStore,
    policy: &DedupPolicy,
    limit: usize,
) -> Vec<&'s DocumentEntry> {
    let mut curated = Vec::with_capacity(limit.min(matches.len()));
    let mut seen: HashSet<&str> = HashSet::new();

    for m in matches {
        if curated.len() >= limit {
            break;
        }

        let Some(entry) = store.get(&m.reference) else {
            tracing::warn!("Search hit '{}' has no document entry, skipping", m.reference);
            continue;
        };

        if seen.insert(policy.dedup_value(entry)) {
            curated.push(entry);
        }
    }

    curated
}
