//! Document metadata produced by the documentation build.
//!
//! A [`DocumentStore`] maps a ref (the search index's primary key) to the
//! [`DocumentEntry`] describing where that object or section lives. It is
//! loaded once and never mutated; everything else borrows from it.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Object type whose entries collapse onto their containing scope.
pub const PY_METHOD: &str = "py:method";

/// Metadata for a single searchable object or section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    #[serde(rename = "ref")]
    pub reference: String,
    pub name: String,
    pub prefix: String,
    pub objtype: String,
    pub filename: String,
    pub displayname: String,
    pub shortanchor: String,
    /// Last component of `prefix` (e.g. the class for a method).
    #[serde(default)]
    pub last_prefix: String,
}

/// Immutable mapping from ref to document metadata.
///
/// Entries keep their insertion order, which is also the order the on-the-fly
/// index assigns document positions in.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    entries: Vec<DocumentEntry>,
    by_ref: BTreeMap<String, usize>,
}

impl DocumentStore {
    /// Builds a store from entries. A later entry with a duplicate ref replaces the earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = DocumentEntry>) -> Self {
        let mut store = Self::default();
        for entry in entries {
            if let Some(&existing) = store.by_ref.get(&entry.reference) {
                tracing::warn!("Duplicate document ref '{}', keeping the last one", entry.reference);
                store.entries[existing] = entry;
            } else {
                store.by_ref.insert(entry.reference.clone(), store.entries.len());
                store.entries.push(entry);
            }
        }
        store
    }

    /// Parses the JSON object form written by the build: `{ "<ref>": { ...entry } }`.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let raw: BTreeMap<String, DocumentEntry> = serde_json::from_str(json)?;

        for (key, entry) in &raw {
            if *key != entry.reference {
                return Err(StoreError::RefMismatch {
                    key: key.clone(),
                    declared: entry.reference.clone(),
                });
            }
        }

        let mut entries: Vec<_> = raw.into_values().collect();
        // Refs are usually sequential integers; order them numerically when they are.
        entries.sort_by(|a, b| match (a.reference.parse::<u64>(), b.reference.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.reference.cmp(&b.reference),
        });
        Ok(Self::from_entries(entries))
    }

    /// Loads a store from a JSON file on disk.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_json(&content)?;
        tracing::debug!("Loaded {} documents from {}", store.len(), path.display());
        Ok(store)
    }

    /// Serializes the store back into its JSON object form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|entry| serde_json::to_value(entry).map(|value| (entry.reference.clone(), value)))
            .collect::<serde_json::Result<_>>()?;
        serde_json::to_string(&map)
    }

    pub fn get(&self, reference: &str) -> Option<&DocumentEntry> {
        self.by_ref.get(reference).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.by_ref.contains_key(reference)
    }

    /// Iterates entries in store order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash of every indexed field, used to tie a precomputed index to the data it was built from.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for entry in &self.entries {
            for field in [&entry.reference, &entry.name, &entry.prefix] {
                hasher.update(field.as_bytes());
                hasher.update(&[0]);
            }
        }
        hasher.digest()
    }
}

impl<'a> IntoIterator for &'a DocumentStore {
    type Item = &'a DocumentEntry;
    type IntoIter = std::slice::Iter<'a, DocumentEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
pub(crate) fn entry(reference: &str, name: &str, prefix: &str, objtype: &str) -> DocumentEntry {
    DocumentEntry {
        reference: reference.to_string(),
        name: name.to_string(),
        prefix: prefix.to_string(),
        objtype: objtype.to_string(),
        filename: format!("api/{}", prefix.replace('.', "/")),
        displayname: name.to_string(),
        shortanchor: format!("{}.{}", prefix, name),
        last_prefix: prefix.rsplit('.').next().unwrap_or_default().to_string(),
    }
}
