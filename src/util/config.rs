use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const APP_CONFIG_FILE: &str = "app.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Play JPA Plugin configuration requires a non-empty `{0}`")]
    Missing(&'static str),
}

/// Where to find the plugin and which versions of it are acceptable.
///
/// `version` is a version constraint such as `0.+` or `1.2.3_RELEASE`, resolved against the
/// `index.yml` found under `repository_root`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfiguration {
    pub version: String,
    pub repository_root: String,
}

impl PluginConfiguration {
    pub fn with_overrides(mut self, overrides: &PluginConfigurationOverrides) -> Self {
        if let Some(version) = &overrides.version {
            self.version = version.clone();
        }
        if let Some(repository_root) = &overrides.repository_root {
            self.repository_root = repository_root.clone();
        }
        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::Missing("version"));
        }
        if self.repository_root.trim().is_empty() {
            return Err(ConfigError::Missing("repository_root"));
        }
        Ok(self)
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfigurationOverrides {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub repository_root: Option<String>,
}

/// The parts of an application's `app.toml` this buildpack reads. Other tables are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub play_jpa_plugin: PluginConfigurationOverrides,
}

impl AppConfig {
    pub fn from_dir(app_dir: &Path) -> Result<Self, ConfigError> {
        let file = app_dir.join(APP_CONFIG_FILE);
        match fs::read_to_string(&file) {
            Ok(text) => {
                toml::from_str(&text).map_err(|source| ConfigError::Parse { path: file, source })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(AppConfig::default()),
            Err(source) => Err(ConfigError::Read { path: file, source }),
        }
    }
}

/// Buildpack defaults overlaid by the application's own `app.toml`.
pub fn resolve_configuration(
    app_dir: &Path,
    defaults: &PluginConfiguration,
) -> Result<PluginConfiguration, ConfigError> {
    let app_config = AppConfig::from_dir(app_dir)?;
    defaults
        .clone()
        .with_overrides(&app_config.play_jpa_plugin)
        .validate()
}
