//! Conversion of Sphinx search data into a [`DocumentStore`].
//!
//! Sphinx writes `searchindex.js` as `Search.setIndex({...})`. API objects and
//! title terms from that payload become document entries with sequential refs;
//! full-text terms are left out, they would make the store far too large.
//!
//! Objects and title terms keep their order from the payload, so refs follow
//! Sphinx's own ordering and equal-score hits rank the same way on every build.

use crate::error::StoreError;
use crate::store::{DocumentEntry, DocumentStore, PY_METHOD};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;

const SET_INDEX_CALL: &str = "Search.setIndex(";

#[derive(Debug, Deserialize)]
struct SphinxIndex {
    /// Document base names (Sphinx >= 1.5).
    #[serde(default)]
    docnames: Option<Vec<String>>,
    /// Document names in older releases.
    #[serde(default)]
    filenames: Vec<String>,
    #[serde(default)]
    objects: IndexMap<String, ObjectGroup>,
    #[serde(default)]
    objtypes: BTreeMap<String, String>,
    #[serde(default)]
    titles: Vec<String>,
    #[serde(default)]
    titleterms: IndexMap<String, OneOrMany>,
}

/// Objects sharing a prefix: `{name: [doc, type, prio, anchor]}` before Sphinx 5,
/// `[[doc, type, prio, anchor, name]]` after.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ObjectGroup {
    Named(IndexMap<String, (usize, usize, i64, String)>),
    Listed(Vec<(usize, usize, i64, String, String)>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(usize),
    Many(Vec<usize>),
}

impl OneOrMany {
    fn as_slice(&self) -> &[usize] {
        match self {
            Self::One(index) => std::slice::from_ref(index),
            Self::Many(indices) => indices,
        }
    }
}

/// One API object before its ref is assigned.
struct RawObject<'a> {
    prefix: &'a str,
    name: &'a str,
    doc: usize,
    typeindex: usize,
    shortanchor: &'a str,
}

/// Parses `searchindex.js` (or its bare JSON payload) into a document store.
pub fn convert(content: &str) -> Result<DocumentStore, StoreError> {
    let index: SphinxIndex = serde_json::from_str(strip_script_wrapper(content))?;
    let docnames = index.docnames.as_deref().unwrap_or(index.filenames.as_slice());

    let filename = |doc: usize| {
        docnames
            .get(doc)
            .ok_or(StoreError::DanglingIndex {
                what: "document",
                index: doc,
            })
    };

    let mut entries = Vec::new();
    let mut next_ref = 0usize;
    let mut push = |entries: &mut Vec<DocumentEntry>, mut entry: DocumentEntry| {
        entry.reference = next_ref.to_string();
        next_ref += 1;
        entries.push(entry);
    };

    for (prefix, group) in &index.objects {
        for object in raw_objects(prefix, group) {
            let objtype = index
                .objtypes
                .get(&object.typeindex.to_string())
                .ok_or(StoreError::DanglingIndex {
                    what: "object type",
                    index: object.typeindex,
                })?;
            let file = filename(object.doc)?;
            if let Some(entry) = object_entry(&object, objtype, file) {
                push(&mut entries, entry);
            }
        }
    }

    for (term, docs) in &index.titleterms {
        for &doc in docs.as_slice() {
            let title = index.titles.get(doc).ok_or(StoreError::DanglingIndex {
                what: "title",
                index: doc,
            })?;
            push(
                &mut entries,
                DocumentEntry {
                    reference: String::new(),
                    name: title.clone(),
                    prefix: term.clone(),
                    objtype: String::new(),
                    filename: filename(doc)?.clone(),
                    displayname: title.clone(),
                    shortanchor: String::new(),
                    last_prefix: String::new(),
                },
            );
        }
    }

    tracing::info!(
        "Converted Sphinx search data: {} documents ({} objects, {} title terms)",
        entries.len(),
        index.objects.len(),
        index.titleterms.len()
    );
    Ok(DocumentStore::from_entries(entries))
}

fn raw_objects<'a>(prefix: &'a str, group: &'a ObjectGroup) -> Vec<RawObject<'a>> {
    match group {
        ObjectGroup::Named(objects) => objects
            .iter()
            .map(|(name, (doc, typeindex, _prio, shortanchor))| RawObject {
                prefix,
                name,
                doc: *doc,
                typeindex: *typeindex,
                shortanchor,
            })
            .collect(),
        ObjectGroup::Listed(objects) => objects
            .iter()
            .map(|(doc, typeindex, _prio, shortanchor, name)| RawObject {
                prefix,
                name,
                doc: *doc,
                typeindex: *typeindex,
                shortanchor,
            })
            .collect(),
    }
}

/// Builds the entry for an API object, deriving scope and display name per domain.
fn object_entry(object: &RawObject<'_>, objtype: &str, filename: &str) -> Option<DocumentEntry> {
    let (prefix, name, last_prefix, displayname) = if objtype.starts_with("cpp:") {
        // C++ names carry their scope: "ns::Widget::resize"
        let Some((scope, name)) = object.name.rsplit_once("::") else {
            tracing::warn!(
                "Skipping C++ object without scope: {:?} ({}, {})",
                object.name,
                object.prefix,
                objtype
            );
            return None;
        };
        let last = scope.rsplit("::").next().unwrap_or(scope);
        (scope, name, last, name.to_string())
    } else {
        let last = object.prefix.rsplit('.').next().unwrap_or(object.prefix);
        let displayname = if objtype == PY_METHOD {
            format!("{}.{}", last, object.name)
        } else if objtype.starts_with("py:") && !object.prefix.is_empty() {
            format!("{}.{}", object.prefix, object.name)
        } else {
            object.name.to_string()
        };
        (object.prefix, object.name, last, displayname)
    };

    Some(DocumentEntry {
        reference: String::new(),
        name: name.to_string(),
        prefix: prefix.to_string(),
        objtype: objtype.to_string(),
        filename: filename.to_string(),
        displayname,
        shortanchor: object.shortanchor.to_string(),
        last_prefix: last_prefix.to_string(),
    })
}

/// Strips `Search.setIndex(` ... `)` around the JSON payload, if present.
fn strip_script_wrapper(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix(SET_INDEX_CALL)
        .and_then(|rest| rest.trim_end().trim_end_matches(';').trim_end().strip_suffix(')'))
        .unwrap_or(trimmed)
}
