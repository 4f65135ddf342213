//! Detection and provisioning of the Play JPA plugin.
//!
//! Play applications that use JPA, and every Play 2.0.x application, need the plugin on their
//! classpath. Whether it applies and which artifact to fetch are decided once, when a
//! [`PlayJpaPlugin`] is constructed; `detect`, `compile` and `release` only project that decision.

use glob::Pattern;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::repository::{Catalog, CatalogError};
use crate::util::cache::{DownloadError, Downloader};
use crate::util::config::PluginConfiguration;
use crate::util::files::find_first;
use crate::util::play::{self, FrameworkError};

pub use crate::repository::ResolvedPlugin;

pub const PLAY_JPA_PLUGIN_JAR: &str = "*play-java-jpa*.jar";
pub const DESCRIPTION: &str = "Play JPA Plugin";
pub const LIB_DIRECTORY: &str = ".lib";
const PLAY_20_VERSION: &str = r"^2\.0\.\d+";

#[derive(thiserror::Error, Debug)]
pub enum PluginError {
    #[error(transparent)]
    Framework(#[from] FrameworkError),
    #[error("Play JPA Plugin is required but cannot be resolved: {0}")]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Everything the plugin needs to know about the application being built.
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    pub app_dir: PathBuf,
    pub lib_directory: PathBuf,
    pub configuration: PluginConfiguration,
}

#[derive(Debug)]
pub struct PlayJpaPlugin {
    lib_directory: PathBuf,
    resolved: Option<ResolvedPlugin>,
}

impl PlayJpaPlugin {
    /// Detects the plugin and resolves its version.
    ///
    /// The catalog is only consulted when the application needs the plugin. An application that
    /// needs it but whose configuration selects no artifact is an error, not a silent miss.
    pub fn new(context: ApplicationContext, catalog: &impl Catalog) -> Result<Self, PluginError> {
        let resolved = if is_applicable(&context.app_dir)? {
            Some(catalog.find_item(&context.configuration)?)
        } else {
            None
        };

        Ok(PlayJpaPlugin {
            lib_directory: context.lib_directory,
            resolved,
        })
    }

    /// `play-jpa-plugin-<version>` when the plugin applies.
    pub fn detect(&self) -> Option<String> {
        self.resolved.as_ref().map(|plugin| id(&plugin.version))
    }

    /// Downloads the plugin jar into the library directory. Does nothing when it does not apply.
    pub fn compile(&self, downloader: &mut impl Downloader) -> Result<(), PluginError> {
        if let Some(plugin) = &self.resolved {
            downloader.download_jar(
                &plugin.version,
                &plugin.uri,
                DESCRIPTION,
                &jar_name(&plugin.version),
                &self.lib_directory,
            )?;
        }
        Ok(())
    }

    /// The plugin contributes nothing at runtime.
    pub fn release(&self) {}

    pub fn resolved(&self) -> Option<&ResolvedPlugin> {
        self.resolved.as_ref()
    }
}

/// Where additional libraries are placed for an application staged in `app_dir`.
pub fn lib_directory(app_dir: &Path) -> PathBuf {
    app_dir.join(LIB_DIRECTORY)
}

pub fn id(version: &str) -> String {
    format!("play-jpa-plugin-{}", version)
}

pub fn jar_name(version: &str) -> String {
    format!("{}.jar", id(version))
}

/// Whether the Play application in `app_dir` needs the plugin. Not being a Play application at
/// all is a plain `false`.
pub fn is_applicable(app_dir: &Path) -> Result<bool, FrameworkError> {
    Ok(match play::root(app_dir)? {
        Some(root) => uses_jpa(&root) || is_play_20(&root),
        None => false,
    })
}

fn uses_jpa(root: &Path) -> bool {
    Pattern::new(PLAY_JPA_PLUGIN_JAR).map_or(false, |pattern| {
        find_first(&play::lib(root), &pattern)
            .or_else(|| find_first(&play::staged(root), &pattern))
            .is_some()
    })
}

fn is_play_20(root: &Path) -> bool {
    match (play::version(root), Regex::new(PLAY_20_VERSION)) {
        (Some(version), Ok(pattern)) => pattern.is_match(&version),
        _ => false,
    }
}
