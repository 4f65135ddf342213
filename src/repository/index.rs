use std::collections::BTreeMap;

use crate::repository::{version, CatalogError, ResolvedPlugin};
use crate::util::fetch;

pub const INDEX_FILE: &str = "index.yml";

/// A repository's `index.yml`: a map of version to artifact URI.
#[derive(Debug, Clone, Default)]
pub struct RepositoryIndex {
    entries: BTreeMap<String, String>,
}

impl RepositoryIndex {
    pub fn load(repository_root: &str) -> Result<Self, CatalogError> {
        let uri = index_uri(repository_root);
        let text = fetch::get(&uri).map_err(|source| CatalogError::Index {
            uri: uri.clone(),
            source,
        })?;
        Self::parse(&uri, &text)
    }

    pub fn parse(uri: &str, text: &str) -> Result<Self, CatalogError> {
        if text.trim().is_empty() {
            return Ok(RepositoryIndex::default());
        }
        // Keys are read as strings so `0.10` keeps its text instead of becoming the float `0.1`.
        let raw: BTreeMap<String, String> =
            serde_yaml::from_str(text).map_err(|source| CatalogError::MalformedIndex {
                uri: uri.to_string(),
                source,
            })?;

        if let Some((version, _)) = raw.iter().find(|(_, location)| location.trim().is_empty()) {
            return Err(CatalogError::MissingUri {
                version: version.clone(),
            });
        }
        Ok(RepositoryIndex { entries: raw })
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The highest indexed version satisfying `candidate`, with its URI.
    pub fn find_item(&self, candidate: &str) -> Result<ResolvedPlugin, CatalogError> {
        let found = version::resolve(candidate, self.versions())?;
        let version = found.ok_or_else(|| CatalogError::NoVersionResolvable {
            candidate: candidate.to_string(),
            versions: self.versions().map(str::to_string).collect(),
        })?;
        let uri = self.entries[version].clone();
        Ok(ResolvedPlugin {
            version: version.to_string(),
            uri,
        })
    }
}

pub fn index_uri(repository_root: &str) -> String {
    format!("{}/{}", repository_root.trim_end_matches('/'), INDEX_FILE)
}
