//! The search session: one store, one settled index, and the list the user is looking at.
//!
//! The input layer calls the entry points here for every event it receives:
//! [`SearchSession::set_query`] on text changes, [`SearchSession::press`] for
//! arrow keys, [`SearchSession::hover`]/[`SearchSession::unhover`] for the
//! pointer and [`SearchSession::activate`] on confirm. Each call runs to
//! completion; the session is never shared between threads.

use crate::config::SiteConfig;
use crate::curate::{DedupPolicy, curate};
use crate::error::Result;
use crate::link::{LinkConfig, build_href};
use crate::navigation::{NavKey, NavigationController, Selection};
use crate::search::{FileArtifact, IndexOrigin, IndexProvider, QueryEngine, SearchIndex};
use crate::store::DocumentStore;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// A rendered suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "ref")]
    pub reference: String,
    pub displayname: String,
    pub href: String,
}

/// What the result list currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Listing {
    /// No query; the list is empty and hidden.
    #[default]
    Cleared,
    /// The query matched nothing; a placeholder is shown.
    NoResults,
    Suggestions(Vec<Suggestion>),
}

impl Listing {
    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Self::Suggestions(items) => items,
            Self::Cleared | Self::NoResults => &[],
        }
    }

    /// Whether the list has anything to draw (the placeholder counts).
    pub const fn has_rows(&self) -> bool {
        !matches!(self, Self::Cleared)
    }
}

pub struct SearchSession {
    store: Arc<DocumentStore>,
    engine: QueryEngine,
    links: LinkConfig,
    policy: DedupPolicy,
    limit: usize,
    query: String,
    listing: Listing,
    nav: NavigationController,
    open: bool,
}

impl SearchSession {
    /// Creates a session over a settled index. Queries cannot run before this exists.
    pub fn new(store: Arc<DocumentStore>, index: Arc<SearchIndex>, config: &SiteConfig) -> Self {
        Self {
            store,
            engine: QueryEngine::new(index, config.results.query_cache),
            links: config.links.clone(),
            policy: config.dedup_policy(),
            limit: config.results.limit,
            query: String::new(),
            listing: Listing::Cleared,
            nav: NavigationController::default(),
            open: false,
        }
    }

    /// Loads the site's document store and acquires its index.
    pub async fn open(site_root: &Path, config: &SiteConfig) -> Result<(Self, IndexOrigin)> {
        let documents = config.documents_path(site_root);
        let store = Arc::new(
            DocumentStore::load(&documents)
                .await
                .with_context(|| format!("Failed to load documents for site {}", site_root.display()))?,
        );

        let provider = IndexProvider::new(FileArtifact::new(config.artifact_path(site_root)));
        let acquired = provider.acquire(&store).await;
        Ok((Self::new(store, acquired.index, config), acquired.origin))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    pub const fn selection(&self) -> Selection {
        self.nav.selection()
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The search field's text changed.
    ///
    /// Empty text clears and hides the list without searching. Retyping the
    /// current query keeps the list and its selection.
    pub fn set_query(&mut self, text: &str) -> &Listing {
        if text.trim().is_empty() {
            self.query.clear();
            self.replace_listing(Listing::Cleared);
            self.open = false;
            return &self.listing;
        }
        if text == self.query {
            return &self.listing;
        }

        self.query = text.to_string();
        let matches = self.engine.search(text);
        let suggestions: Vec<_> = curate(&matches, &self.store, &self.policy, self.limit)
            .into_iter()
            .map(|entry| Suggestion {
                reference: entry.reference.clone(),
                displayname: entry.displayname.clone(),
                href: build_href(entry, &self.links),
            })
            .collect();

        let listing = if suggestions.is_empty() {
            Listing::NoResults
        } else {
            Listing::Suggestions(suggestions)
        };
        self.replace_listing(listing);
        self.open = true;
        &self.listing
    }

    fn replace_listing(&mut self, listing: Listing) {
        self.nav.reset(listing.suggestions().len());
        self.listing = listing;
    }

    pub fn press(&mut self, key: NavKey) -> Selection {
        self.nav.press(key)
    }

    pub fn hover(&mut self, i: usize) {
        self.nav.hover(i);
    }

    pub fn unhover(&mut self, i: usize) {
        self.nav.unhover(i);
    }

    /// Confirm: the href to navigate to, or `None` when nothing is active.
    pub fn activate(&self) -> Option<&str> {
        let i = self.nav.activate()?;
        self.listing.suggestions().get(i).map(|s| s.href.as_str())
    }

    /// The search field lost focus; the list hides but keeps its contents.
    pub fn focus_out(&mut self) {
        self.open = false;
    }

    /// The search field gained focus; the list reappears if it has rows.
    pub fn focus_in(&mut self) {
        self.open = self.listing.has_rows();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::entry;
    use assert2::{check, let_assert};

    fn session() -> SearchSession {
        let store = Arc::new(DocumentStore::from_entries([
            entry("0", "Loader", "pkg.loader", "py:class"),
            entry("1", "load", "pkg.loader.Loader", "py:method"),
            entry("2", "load_all", "pkg.loader.Loader", "py:method"),
            entry("3", "Loading data", "loading", ""),
        ]));
        let index = Arc::new(SearchIndex::build(&store));
        SearchSession::new(store, index, &SiteConfig::default())
    }

    #[test]
    fn test_empty_query_clears_and_hides() {
        let mut session = session();
        session.set_query("loader");
        check!(session.is_open());

        check!(*session.set_query("") == Listing::Cleared);
        check!(!session.is_open());
        check!(session.selection() == Selection::Idle);
        session.focus_in();
        check!(!session.is_open());
    }

    #[test]
    fn test_no_results_placeholder() {
        let mut session = session();
        check!(*session.set_query("zebra") == Listing::NoResults);
        check!(session.is_open());
        check!(session.press(NavKey::Next) == Selection::Idle);
        check!(session.activate().is_none());
    }

    #[test]
    fn test_activate_follows_selection() {
        let mut session = session();
        let_assert!(Listing::Suggestions(items) = session.set_query("Loader").clone());
        check!(items[0].reference == "0");
        check!(session.activate().is_none());

        session.press(NavKey::Next);
        check!(session.activate() == Some(items[0].href.as_str()));
        check!(items[0].href == "api/pkg/loader.html?highlight=Loader#pkg.loader.Loader");
    }

    #[test]
    fn test_new_query_resets_selection() {
        let mut session = session();
        session.set_query("load");
        session.press(NavKey::Next);
        check!(session.selection() == Selection::Active(0));

        session.set_query("load");
        check!(session.selection() == Selection::Active(0));

        session.set_query("loading");
        check!(session.selection() == Selection::Idle);
    }

    #[test]
    fn test_methods_of_one_class_collapse() {
        let mut session = session();
        session.set_query("load");
        let methods = session
            .listing()
            .suggestions()
            .iter()
            .filter(|s| s.reference == "1" || s.reference == "2")
            .count();
        check!(methods <= 1);
    }

    #[test]
    fn test_focus_round_trip() {
        let mut session = session();
        session.set_query("loader");
        session.focus_out();
        check!(!session.is_open());
        session.focus_in();
        check!(session.is_open());
    }
}
