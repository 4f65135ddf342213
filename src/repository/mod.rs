//! Resolution of a configured version constraint to a concrete artifact.

pub mod index;
pub mod version;

use crate::util::config::PluginConfiguration;
use crate::util::fetch::FetchError;

pub use index::RepositoryIndex;
pub use version::TokenizedVersion;

/// A concrete plugin artifact: the version chosen and where to download it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlugin {
    pub version: String,
    pub uri: String,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Unable to fetch repository index {uri}: {source}")]
    Index {
        uri: String,
        #[source]
        source: FetchError,
    },
    #[error("Repository index {uri} is malformed: {source}")]
    MalformedIndex {
        uri: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },
    #[error("Repository index has no URI for version {version}")]
    MissingUri { version: String },
    #[error("No version resolvable for '{candidate}' in {versions:?}")]
    NoVersionResolvable {
        candidate: String,
        versions: Vec<String>,
    },
}

/// Maps a configuration to the artifact it selects.
pub trait Catalog {
    fn find_item(&self, configuration: &PluginConfiguration)
        -> Result<ResolvedPlugin, CatalogError>;
}

/// Resolves against the `index.yml` published under the configured `repository_root`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepositoryCatalog;

impl Catalog for RepositoryCatalog {
    fn find_item(
        &self,
        configuration: &PluginConfiguration,
    ) -> Result<ResolvedPlugin, CatalogError> {
        RepositoryIndex::load(&configuration.repository_root)?.find_item(&configuration.version)
    }
}
