pub mod build;
pub mod cli;
pub mod config;
pub mod curate;
pub mod error;
pub mod link;
pub mod navigation;
pub mod search;
pub mod session;
pub mod sphinx;
pub mod store;
pub mod tracing;

pub use config::SiteConfig;
pub use curate::{DedupKey, DedupPolicy, curate};
pub use link::{LinkConfig, build_href};
pub use navigation::{NavKey, NavigationController, Selection};
pub use search::{IndexOrigin, IndexProvider, Match, QueryEngine, SearchIndex};
pub use session::{Listing, SearchSession, Suggestion};
pub use store::{DocumentEntry, DocumentStore};
