use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::util::config::PluginConfiguration;

/// This struct is the buildpack defined `metadata` key in the `buildpack.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayJpaPluginBuildpackMetadata {
    pub play_jpa_plugin: PluginConfiguration,
}

impl TryFrom<&Table> for PlayJpaPluginBuildpackMetadata {
    type Error = anyhow::Error;

    fn try_from(value: &Table) -> Result<Self, Self::Error> {
        Ok(toml::from_str(&toml::to_string(&value)?)?)
    }
}

impl PlayJpaPluginBuildpackMetadata {
    /// Read the `[metadata]` table of a `buildpack.toml` document.
    pub fn from_buildpack_toml(text: &str) -> anyhow::Result<Self> {
        let descriptor: Table = toml::from_str(text)?;
        let metadata = descriptor
            .get("metadata")
            .and_then(Value::as_table)
            .ok_or_else(|| anyhow!("buildpack.toml has no [metadata] table"))?;
        Self::try_from(metadata)
    }

    /// The metadata of the `buildpack.toml` this binary was built with.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_buildpack_toml(include_str!("../../buildpack.toml"))
    }
}
