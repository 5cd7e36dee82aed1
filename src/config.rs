//! Site configuration.
//!
//! Everything is optional: a missing file or section falls back to defaults
//! that match a standard documentation build layout. Values are read once at
//! startup; command-line flags override them afterwards.

use crate::curate::{DEFAULT_LIMIT, DedupKey, DedupPolicy};
use crate::error::ConfigError;
use crate::link::LinkConfig;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up in the site root when no path is given.
pub const CONFIG_FILE_NAME: &str = "docsearch.toml";

/// Location of the document store, relative to the site root.
pub const DEFAULT_DOCUMENTS_PATH: &str = "_static/search/documents.json";
/// Location of the precomputed index artifact, relative to the site root.
pub const DEFAULT_ARTIFACT_PATH: &str = "_static/search/docindex.bin";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub links: LinkConfig,
    pub results: ResultsConfig,
    pub paths: PathsConfig,
    /// Object type → dedup key overrides, on top of the built-in `py:method = "prefix"`.
    pub dedup: BTreeMap<String, DedupKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Maximum suggestions shown.
    pub limit: usize,
    /// Recent queries remembered by the session (0 disables).
    pub query_cache: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            query_cache: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub documents: String,
    pub artifact: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            documents: DEFAULT_DOCUMENTS_PATH.to_string(),
            artifact: DEFAULT_ARTIFACT_PATH.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or `<site_root>/docsearch.toml` when it exists, or the defaults.
    pub fn load(site_root: &Path, path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (PathBuf::from(expand_tilde(&p.to_string_lossy()).as_ref()), true),
            None => (site_root.join(CONFIG_FILE_NAME), false),
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_toml(&content, &path)
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.results.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(())
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        self.dedup
            .iter()
            .fold(DedupPolicy::default(), |policy, (objtype, key)| {
                policy.with(objtype.clone(), *key)
            })
    }

    pub fn documents_path(&self, site_root: &Path) -> PathBuf {
        resolve(site_root, &self.paths.documents)
    }

    pub fn artifact_path(&self, site_root: &Path) -> PathBuf {
        resolve(site_root, &self.paths.artifact)
    }
}

/// Resolves a configured path: `~` expands to the home directory, relative paths join the site root.
fn resolve(site_root: &Path, configured: &str) -> PathBuf {
    let expanded = expand_tilde(configured);
    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        site_root.join(path)
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
