use libcnb::build::{BuildContext, BuildResult, BuildResultBuilder};
use libcnb::data::layer_name;
use libcnb::layer::{CachedLayerDefinition, InvalidMetadataAction, RestoredLayerAction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::plugin::{lib_directory, ApplicationContext, PlayJpaPlugin};
use crate::repository::RepositoryCatalog;
use crate::util::cache::ApplicationCache;
use crate::util::config::{resolve_configuration, PluginConfiguration};
use crate::util::error::PlayJpaPluginBuildpackError;
use crate::util::logger::{BuildLogger, Logger};
use crate::PlayJpaPluginBuildpack;

/// Recorded on the download cache layer so a different repository starts from an empty cache.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub(crate) struct DownloadCacheMetadata {
    repository_root: String,
}

/// `bin/build`
pub fn build(
    context: BuildContext<PlayJpaPluginBuildpack>,
) -> libcnb::Result<BuildResult, PlayJpaPluginBuildpackError> {
    let mut logger = BuildLogger::new(false, true);
    logger
        .header("Play JPA Plugin")
        .map_err(PlayJpaPluginBuildpackError::Log)?;

    let configuration = resolve_configuration(
        &context.app_dir,
        &context.buildpack_descriptor.metadata.play_jpa_plugin,
    )
    .map_err(PlayJpaPluginBuildpackError::Config)?;
    let repository_root = configuration.repository_root.clone();

    let cache_layer = context.cached_layer(
        layer_name!("download-cache"),
        CachedLayerDefinition {
            build: false,
            launch: false,
            invalid_metadata_action: &|_| InvalidMetadataAction::DeleteLayer,
            restored_layer_action: &|metadata: &DownloadCacheMetadata, _| {
                if metadata.repository_root == repository_root {
                    RestoredLayerAction::KeepLayer
                } else {
                    RestoredLayerAction::DeleteLayer
                }
            },
        },
    )?;

    compile_plugin(
        &context.app_dir,
        configuration,
        lib_directory(&context.app_dir),
        &cache_layer.path(),
        logger,
    )?;
    cache_layer.write_metadata(DownloadCacheMetadata { repository_root })?;

    BuildResultBuilder::new().build()
}

/// Detects the plugin for the application in `app_dir` and downloads it into `lib_directory`.
///
/// Returns the identifier of the provisioned plugin, or `None` when the application does not
/// need it.
pub fn compile_plugin<L: Logger>(
    app_dir: &Path,
    configuration: PluginConfiguration,
    lib_directory: PathBuf,
    cache_dir: &Path,
    logger: L,
) -> Result<Option<String>, PlayJpaPluginBuildpackError> {
    let plugin = PlayJpaPlugin::new(
        ApplicationContext {
            app_dir: app_dir.to_path_buf(),
            lib_directory,
            configuration,
        },
        &RepositoryCatalog,
    )?;

    let mut cache = ApplicationCache::new(cache_dir, logger);
    plugin.compile(&mut cache)?;
    Ok(plugin.detect())
}
