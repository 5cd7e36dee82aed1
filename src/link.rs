//! Destination URLs for suggestions.

use crate::store::DocumentEntry;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters escaped in the highlight parameter, matching `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Site layout and navigation options, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Prefix joining the current page to the documentation root (e.g. `../`).
    pub url_root: String,
    /// Page extension appended to each filename (e.g. `.html`).
    pub file_suffix: String,
    /// Append `?highlight=<name>` so the target page highlights the match.
    pub highlight: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            url_root: String::new(),
            file_suffix: ".html".to_string(),
            highlight: true,
        }
    }
}

/// `url_root + filename + file_suffix [+ ?highlight=name] + #shortanchor`
pub fn build_href(entry: &DocumentEntry, config: &LinkConfig) -> String {
    let mut href = String::with_capacity(
        config.url_root.len()
            + entry.filename.len()
            + config.file_suffix.len()
            + entry.shortanchor.len()
            + 16,
    );
    href.push_str(&config.url_root);
    href.push_str(&entry.filename);
    href.push_str(&config.file_suffix);
    if config.highlight {
        href.push_str("?highlight=");
        href.extend(utf8_percent_encode(&entry.name, QUERY_VALUE));
    }
    href.push('#');
    href.push_str(&entry.shortanchor);
    href
}
