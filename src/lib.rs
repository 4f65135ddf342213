mod build;
mod cli;
mod data;
mod detect;
pub mod plugin;
pub mod repository;
pub mod util;

use libcnb::build::{BuildContext, BuildResult};
use libcnb::detect::{DetectContext, DetectResult};
use libcnb::generic::GenericPlatform;
use libcnb::Buildpack;

pub use build::compile_plugin;
pub use cli::{cli, execute};
pub use data::buildpack_toml::PlayJpaPluginBuildpackMetadata;
pub use detect::detect_plugin;
pub use plugin::{ApplicationContext, PlayJpaPlugin, PluginError, ResolvedPlugin};
pub use util::error::PlayJpaPluginBuildpackError;

pub struct PlayJpaPluginBuildpack;

impl Buildpack for PlayJpaPluginBuildpack {
    type Platform = GenericPlatform;
    type Metadata = PlayJpaPluginBuildpackMetadata;
    type Error = PlayJpaPluginBuildpackError;

    fn detect(&self, context: DetectContext<Self>) -> libcnb::Result<DetectResult, Self::Error> {
        detect::detect(context)
    }

    fn build(&self, context: BuildContext<Self>) -> libcnb::Result<BuildResult, Self::Error> {
        build::build(context)
    }
}
