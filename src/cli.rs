use crate::config::SiteConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docsearch")]
#[command(about = "Incremental search over generated documentation", long_about = None)]
pub struct Cli {
    /// Root directory of the built documentation site
    #[arg(short, long, global = true, default_value = ".")]
    pub site: PathBuf,
    /// Config file (defaults to <site>/docsearch.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(flatten)]
    pub overrides: Overrides,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the precomputed index artifact (and the document store, when converting)
    BuildIndex {
        /// Sphinx `searchindex.js` to convert into the site's document store
        #[arg(long)]
        sphinx: Option<PathBuf>,
    },
    /// Print the suggestions for one query
    Search {
        query: String,
        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drive a session from stdin: text sets the query, `:down`/`:up`/`:enter`/`:clear` navigate
    Interactive,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    #[arg(long, global = true)]
    pub url_root: Option<String>,
    #[arg(long, global = true)]
    pub file_suffix: Option<String>,
    /// Do not append `?highlight=` to result links
    #[arg(long, global = true)]
    pub no_highlight: bool,
    /// Maximum suggestions shown
    #[arg(short = 'n', long, global = true)]
    pub limit: Option<usize>,
}

impl Overrides {
    pub fn apply(&self, config: &mut SiteConfig) {
        if let Some(url_root) = &self.url_root {
            config.links.url_root.clone_from(url_root);
        }
        if let Some(file_suffix) = &self.file_suffix {
            config.links.file_suffix.clone_from(file_suffix);
        }
        if self.no_highlight {
            config.links.highlight = false;
        }
        if let Some(limit) = self.limit {
            config.results.limit = limit;
        }
    }
}
