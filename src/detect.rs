use libcnb::detect::{DetectContext, DetectResult, DetectResultBuilder};
use std::path::Path;

use crate::plugin::{lib_directory, ApplicationContext, PlayJpaPlugin};
use crate::repository::RepositoryCatalog;
use crate::util::config::{resolve_configuration, PluginConfiguration};
use crate::util::error::PlayJpaPluginBuildpackError;
use crate::util::logger::{BuildLogger, Logger};
use crate::PlayJpaPluginBuildpack;

/// `bin/detect`
pub fn detect(
    context: DetectContext<PlayJpaPluginBuildpack>,
) -> libcnb::Result<DetectResult, PlayJpaPluginBuildpackError> {
    let mut logger = BuildLogger::new(false, true);
    let configuration = resolve_configuration(
        &context.app_dir,
        &context.buildpack_descriptor.metadata.play_jpa_plugin,
    )
    .map_err(PlayJpaPluginBuildpackError::Config)?;

    match detect_plugin(&context.app_dir, configuration)? {
        Some(id) => {
            logger
                .info(format!("Detected {}", id))
                .map_err(PlayJpaPluginBuildpackError::Log)?;
            DetectResultBuilder::pass().build()
        }
        None => DetectResultBuilder::fail().build(),
    }
}

/// The plugin identifier for the application in `app_dir`, if it needs the plugin.
pub fn detect_plugin(
    app_dir: &Path,
    configuration: PluginConfiguration,
) -> Result<Option<String>, PlayJpaPluginBuildpackError> {
    let plugin = PlayJpaPlugin::new(
        ApplicationContext {
            app_dir: app_dir.to_path_buf(),
            lib_directory: lib_directory(app_dir),
            configuration,
        },
        &RepositoryCatalog,
    )?;
    Ok(plugin.detect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginError;
    use crate::repository::CatalogError;
    use crate::util::files::tests::write_file;
    use assert_matches::assert_matches;
    use libcnb::generic::GenericPlatform;
    use libcnb::{Platform, Target};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    struct TestContext {
        app_dir: PathBuf,
        buildpack_dir: PathBuf,
        platform_dir: PathBuf,
        repository: PathBuf,
        _tmp_dir: TempDir,
    }

    impl TestContext {
        fn new(index: &str) -> Self {
            let tmp_dir = tempdir().unwrap();
            let app_dir = tmp_dir.path().join("app");
            let buildpack_dir = tmp_dir.path().join("buildpack");
            let platform_dir = tmp_dir.path().join("platform");
            let repository = tmp_dir.path().join("repository");

            for dir in [&app_dir, &buildpack_dir, &platform_dir] {
                fs::create_dir_all(dir).unwrap();
            }
            write_file(index, &repository.join("index.yml")).unwrap();

            TestContext {
                app_dir,
                buildpack_dir,
                platform_dir,
                repository,
                _tmp_dir: tmp_dir,
            }
        }

        fn repository_root(&self) -> String {
            format!("file://{}", self.repository.display())
        }

        fn configuration(&self) -> PluginConfiguration {
            PluginConfiguration {
                version: "0.+".to_string(),
                repository_root: self.repository_root(),
            }
        }

        /// Points the application's `app.toml` at the local repository.
        fn use_local_repository(&self) {
            write_file(
                &format!(
                    "[play_jpa_plugin]\nrepository_root = \"{}\"\n",
                    self.repository_root()
                ),
                &self.app_dir.join("app.toml"),
            )
            .unwrap();
        }

        fn stage(&self, file: &str) {
            write_file("", &self.app_dir.join(file)).unwrap();
        }

        fn detect_context(&self) -> DetectContext<PlayJpaPluginBuildpack> {
            DetectContext {
                app_dir: self.app_dir.clone(),
                buildpack_dir: self.buildpack_dir.clone(),
                target: Target {
                    os: "linux".to_string(),
                    arch: "amd64".to_string(),
                    arch_variant: None,
                    distro_name: "ubuntu".to_string(),
                    distro_version: "22.04".to_string(),
                },
                platform: GenericPlatform::from_path(&self.platform_dir).unwrap(),
                buildpack_descriptor: toml::from_str(include_str!("../buildpack.toml")).unwrap(),
            }
        }
    }

    #[test]
    fn it_fails_if_no_play_application() {
        let ctx = TestContext::new("0.7.0: http://x/a.jar\n");
        let result = detect_plugin(&ctx.app_dir, ctx.configuration());

        assert_matches!(result.unwrap(), None);
    }

    #[test]
    fn it_passes_detect_if_finds_jpa_jar() {
        let ctx = TestContext::new("0.6.0: http://x/a.jar\n0.7.0: http://x/b.jar\n");
        ctx.stage("start");
        ctx.stage("lib/play-java-jpa_2.10-2.1.3.jar");
        let result = detect_plugin(&ctx.app_dir, ctx.configuration());

        assert_eq!(result.unwrap().as_deref(), Some("play-jpa-plugin-0.7.0"));
    }

    #[test]
    fn it_errors_if_required_plugin_is_not_in_repository() {
        let ctx = TestContext::new("1.0.0: http://x/a.jar\n");
        ctx.stage("start");
        ctx.stage("staged/play_2.9.1-2.0.5.jar");
        let result = detect_plugin(&ctx.app_dir, ctx.configuration());

        assert_matches!(
            result,
            Err(PlayJpaPluginBuildpackError::Plugin(PluginError::Catalog(
                CatalogError::NoVersionResolvable { .. }
            )))
        );
    }

    #[test]
    fn bin_detect_passes_for_play_20_application() {
        let ctx = TestContext::new("0.7.0: http://x/a.jar\n");
        ctx.use_local_repository();
        ctx.stage("start");
        ctx.stage("staged/play_2.9.1-2.0.5.jar");
        let result = detect(ctx.detect_context()).unwrap();

        assert!(format!("{:?}", result).contains("Pass"));
    }

    #[test]
    fn bin_detect_fails_without_play_application() {
        let ctx = TestContext::new("0.7.0: http://x/a.jar\n");
        ctx.use_local_repository();
        ctx.stage("README.md");
        let result = detect(ctx.detect_context()).unwrap();

        assert!(format!("{:?}", result).contains("Fail"));
    }

    #[test]
    fn bin_detect_fails_for_play_application_without_jpa() {
        let ctx = TestContext::new("0.7.0: http://x/a.jar\n");
        ctx.stage("start");
        ctx.stage("lib/play_2.10-2.1.3.jar");
        let result = detect(ctx.detect_context()).unwrap();

        assert!(format!("{:?}", result).contains("Fail"));
    }

    #[test]
    fn bin_detect_errors_if_required_plugin_is_not_in_repository() {
        let ctx = TestContext::new("1.0.0: http://x/a.jar\n");
        ctx.use_local_repository();
        ctx.stage("start");
        ctx.stage("lib/play-java-jpa_2.10-2.1.3.jar");

        assert_matches!(
            detect(ctx.detect_context()),
            Err(libcnb::Error::BuildpackError(PlayJpaPluginBuildpackError::Plugin(
                PluginError::Catalog(CatalogError::NoVersionResolvable { .. })
            )))
        );
    }

    #[test]
    fn bin_detect_rejects_broken_app_toml() {
        let ctx = TestContext::new("0.7.0: http://x/a.jar\n");
        write_file("[play_jpa_plugin]\nmirror = \"x\"\n", &ctx.app_dir.join("app.toml")).unwrap();

        assert_matches!(
            detect(ctx.detect_context()),
            Err(libcnb::Error::BuildpackError(PlayJpaPluginBuildpackError::Config(_)))
        );
    }
}
