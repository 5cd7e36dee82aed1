mod common;

use assert2::{check, let_assert};
use common::{TempSite, indexed_site, sample_store};
use docsearch::build::build_site_index;
use docsearch::{IndexOrigin, Listing, NavKey, SearchSession, Selection, SiteConfig};
use rstest::rstest;
use std::collections::HashSet;

async fn open(site: &TempSite, config: &SiteConfig) -> SearchSession {
    let (session, _) = SearchSession::open(site.path(), config)
        .await
        .expect("session should open");
    session
}

fn rows(session: &SearchSession) -> Vec<String> {
    session
        .listing()
        .suggestions()
        .iter()
        .map(|s| s.reference.clone())
        .collect()
}

/// Test: Typing an object's exact name puts an object with that name at the top.
#[rstest]
#[case("Client", &["0"])]
#[case("Response", &["5"])]
#[case("Session", &["7"])]
#[case("status", &["6"])]
#[case("request", &["3", "4", "8"])]
#[tokio::test]
async fn exact_name_ranks_first(
    indexed_site: TempSite,
    #[case] query: &str,
    #[case] expected_top: &[&str],
) {
    let mut session = open(&indexed_site, &SiteConfig::default()).await;
    session.set_query(query);

    let rows = rows(&session);
    let_assert!(Some(first) = rows.first());
    check!(expected_top.contains(&first.as_str()));

    let store = sample_store();
    let_assert!(Some(entry) = store.get(first));
    check!(entry.name == query);
}

/// Test: Every same-named object sorts ahead of unrelated matches.
#[rstest]
#[tokio::test]
async fn same_named_objects_lead(indexed_site: TempSite) {
    let mut session = open(&indexed_site, &SiteConfig::default()).await;
    session.set_query("request");

    let rows = rows(&session);
    let top: HashSet<_> = rows.iter().take(3).map(String::as_str).collect();
    check!(top == HashSet::from(["3", "4", "8"]));
}

/// Test: The list never exceeds the limit and never repeats an entry.
#[rstest]
#[case(5)]
#[case(3)]
#[case(1)]
#[tokio::test]
async fn listing_respects_limit(indexed_site: TempSite, #[case] limit: usize) {
    let mut config = SiteConfig::default();
    config.results.limit = limit;
    let mut session = open(&indexed_site, &config).await;
    session.set_query("httpkit");

    let rows = rows(&session);
    check!(rows.len() == limit);
    let unique: HashSet<_> = rows.iter().collect();
    check!(unique.len() == rows.len());
}

/// Test: Methods of one class collapse into a single suggestion.
#[rstest]
#[tokio::test]
async fn methods_of_one_class_collapse(indexed_site: TempSite) {
    let mut session = open(&indexed_site, &SiteConfig::default()).await;
    session.set_query("client");

    let rows = rows(&session);
    check!(rows.len() == 2);
    check!(rows.contains(&"0".to_string()));
    let methods = rows.iter().filter(|r| ["1", "2", "3"].contains(&r.as_str())).count();
    check!(methods == 1);
}

/// Test: Moving down past the last row stays on the last row, and confirm navigates there.
#[rstest]
#[tokio::test]
async fn keyboard_walk_clamps_and_activates(indexed_site: TempSite) {
    let mut session = open(&indexed_site, &SiteConfig::default()).await;
    session.set_query("client");
    check!(session.selection() == Selection::Idle);
    check!(session.activate().is_none());

    check!(session.press(NavKey::Next) == Selection::Active(0));
    check!(session.press(NavKey::Next) == Selection::Active(1));
    check!(session.press(NavKey::Next) == Selection::Active(1));

    let expected = session.listing().suggestions()[1].href.clone();
    check!(session.activate() == Some(expected.as_str()));

    check!(session.press(NavKey::Prev) == Selection::Active(0));
    check!(session.press(NavKey::Prev) == Selection::Idle);
}

/// Test: A new query drops the previous selection.
#[rstest]
#[tokio::test]
async fn new_query_resets_selection(indexed_site: TempSite) {
    let mut session = open(&indexed_site, &SiteConfig::default()).await;
    session.set_query("client");
    session.press(NavKey::Next);
    session.set_query("request");
    check!(session.selection() == Selection::Idle);
}

/// Test: Clearing the field hides the list; no-match queries say so.
#[rstest]
#[tokio::test]
async fn empty_and_unmatched_queries(indexed_site: TempSite) {
    let mut session = open(&indexed_site, &SiteConfig::default()).await;

    session.set_query("client");
    check!(session.is_open());

    session.set_query("");
    check!(session.listing() == &Listing::Cleared);
    check!(!session.is_open());

    session.set_query("   ");
    check!(session.listing() == &Listing::Cleared);

    session.set_query("zzzzqqq");
    check!(session.listing() == &Listing::NoResults);
    check!(session.is_open());
    check!(session.press(NavKey::Next) == Selection::Idle);
}

/// Test: Hrefs follow the link settings.
#[rstest]
#[case(true, "../api/httpkit.html?highlight=Client#httpkit.Client")]
#[case(false, "../api/httpkit.html#httpkit.Client")]
#[tokio::test]
async fn hrefs_follow_link_settings(
    indexed_site: TempSite,
    #[case] highlight: bool,
    #[case] expected: &str,
) {
    let mut config = SiteConfig::default();
    config.links.url_root = "../".to_string();
    config.links.highlight = highlight;
    let mut session = open(&indexed_site, &config).await;
    session.set_query("Client");

    let_assert!(Some(first) = session.listing().suggestions().first());
    check!(first.reference == "0");
    check!(first.href == expected);
}

/// Test: Section titles are searchable and link to the page without an anchor.
#[rstest]
#[tokio::test]
async fn titles_are_searchable(indexed_site: TempSite) {
    let mut config = SiteConfig::default();
    config.links.highlight = false;
    let mut session = open(&indexed_site, &config).await;
    session.set_query("Quickstart");

    let_assert!(Some(first) = session.listing().suggestions().first());
    check!(first.displayname == "Quickstart");
    check!(first.href == "api/quickstart.html#");
}

const SPHINX_DATA: &str = r#"Search.setIndex({
    "docnames": ["api/loader", "guide"],
    "filenames": ["api/loader.rst", "guide.rst"],
    "objects": {
        "pkg.loader": {"Loader": [0, 0, 1, "pkg.loader.Loader"]},
        "pkg.loader.Loader": {"load": [0, 1, 1, "pkg.loader.Loader.load"]}
    },
    "objtypes": {"0": "py:class", "1": "py:method"},
    "objnames": {},
    "titles": ["Loader API", "User Guide"],
    "titleterms": {"guid": 1, "loader": 0}
});"#;

/// Test: Building from Sphinx data writes both files, and later sessions use the artifact.
#[tokio::test]
async fn build_from_sphinx_then_search() {
    let site = TempSite::new();
    site.create_file("searchindex.js", SPHINX_DATA);
    let config = SiteConfig::default();

    let summary = build_site_index(site.path(), &config, Some(&site.path().join("searchindex.js")))
        .await
        .expect("build should succeed");
    check!(summary.documents_path.is_some());
    check!(summary.artifact_path.exists());
    check!(summary.terms > 0);

    let (mut session, origin) = SearchSession::open(site.path(), &config)
        .await
        .expect("session should open");
    check!(origin == IndexOrigin::Precomputed);
    check!(session.store().len() == summary.documents);

    session.set_query("load");
    let_assert!(Some(first) = session.listing().suggestions().first());
    check!(first.href.starts_with("api/loader.html?highlight="));
}

/// Test: Rebuilding from the existing store refreshes a stale artifact.
#[tokio::test]
async fn rebuild_from_store_replaces_stale_artifact() {
    let site = TempSite::new();
    let store = sample_store();
    site.write_documents(&store);
    site.write_artifact(&docsearch::DocumentStore::from_entries(store.iter().take(2).cloned()));

    let config = SiteConfig::default();
    let (_, before) = SearchSession::open(site.path(), &config).await.expect("open");
    check!(before == IndexOrigin::Built);

    let summary = build_site_index(site.path(), &config, None).await.expect("build");
    check!(summary.documents_path.is_none());
    check!(summary.documents == store.len());

    let (_, after) = SearchSession::open(site.path(), &config).await.expect("open");
    check!(after == IndexOrigin::Precomputed);
}
