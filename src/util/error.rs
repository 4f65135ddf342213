use crate::plugin::PluginError;
use crate::util::config::ConfigError;

/// Buildpack Error Handling
#[derive(thiserror::Error, Debug)]
pub enum PlayJpaPluginBuildpackError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Plugin Error: {0}")]
    Plugin(#[from] PluginError),
    #[error("Logging Error: {0}")]
    Log(#[from] anyhow::Error),
}

impl From<PlayJpaPluginBuildpackError> for libcnb::Error<PlayJpaPluginBuildpackError> {
    fn from(error: PlayJpaPluginBuildpackError) -> Self {
        Self::BuildpackError(error)
    }
}
