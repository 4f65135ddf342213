use std::fs;
use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use play_jpa_plugin_buildpack::repository::{CatalogError, RepositoryCatalog};
use play_jpa_plugin_buildpack::util::cache::{ApplicationCache, DownloadError, Downloader};
use play_jpa_plugin_buildpack::util::config::PluginConfiguration;
use play_jpa_plugin_buildpack::util::logger::GenericLogger;
use play_jpa_plugin_buildpack::{ApplicationContext, PlayJpaPlugin, PluginError};
use tempfile::{tempdir, TempDir};
use termcolor::Buffer;

struct TestSetup {
    // Hold the temp dir so it is not cleaned off disk
    _tmp_dir: TempDir,
    app_dir: PathBuf,
    repository: PathBuf,
}

impl TestSetup {
    fn new() -> Self {
        let tmp_dir = tempdir().unwrap();
        let app_dir = tmp_dir.path().join("app");
        let repository = tmp_dir.path().join("repository");
        for dir in [&app_dir, &repository] {
            fs::create_dir_all(dir).unwrap();
        }
        TestSetup {
            _tmp_dir: tmp_dir,
            app_dir,
            repository,
        }
    }

    fn stage(&self, file: &str) -> &Self {
        let path = self.app_dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
        self
    }

    fn publish(&self, entries: &[(&str, &str)]) {
        let mut index = String::new();
        for (version, contents) in entries {
            let jar = self.repository.join(format!("plugin-{}.jar", version));
            fs::write(&jar, contents).unwrap();
            index.push_str(&format!("\"{}\": file://{}\n", version, jar.display()));
        }
        fs::write(self.repository.join("index.yml"), index).unwrap();
    }

    fn context(&self, version: &str) -> ApplicationContext {
        ApplicationContext {
            app_dir: self.app_dir.clone(),
            lib_directory: self.app_dir.join(".lib"),
            configuration: PluginConfiguration {
                version: version.to_string(),
                repository_root: format!("file://{}", self.repository.display()),
            },
        }
    }

    fn cache(&self) -> ApplicationCache<GenericLogger<Buffer>> {
        ApplicationCache::new(
            self._tmp_dir.path().join("cache"),
            GenericLogger::with_streams(false, false, Buffer::no_color(), Buffer::no_color()),
        )
    }
}

#[derive(Default)]
struct CountingDownloader {
    calls: usize,
}

impl Downloader for CountingDownloader {
    fn download_jar(
        &mut self,
        _version: &str,
        _uri: &str,
        _description: &str,
        _jar_name: &str,
        _target_directory: &Path,
    ) -> Result<(), DownloadError> {
        self.calls += 1;
        Ok(())
    }
}

#[test]
fn jpa_application_gets_the_plugin() {
    let setup = TestSetup::new();
    setup
        .stage("target/start")
        .stage("target/staged/myapp-play-java-jpa-1.2.jar");
    setup.publish(&[("0.9.0", "old"), ("1.0", "new")]);

    let plugin = PlayJpaPlugin::new(setup.context("1.+"), &RepositoryCatalog).unwrap();
    assert_eq!(plugin.detect().as_deref(), Some("play-jpa-plugin-1.0"));
    assert_eq!(plugin.detect(), plugin.detect());

    let mut cache = setup.cache();
    plugin.compile(&mut cache).unwrap();

    let jar_name = format!("{}.jar", plugin.detect().unwrap());
    assert_eq!(
        fs::read_to_string(setup.app_dir.join(".lib").join(jar_name)).unwrap(),
        "new"
    );
}

#[test]
fn play_20_application_without_catalog_entry_is_an_error() {
    let setup = TestSetup::new();
    setup.stage("start").stage("staged/play_2.9.1-2.0.5.jar");
    setup.publish(&[]);

    let result = PlayJpaPlugin::new(setup.context("0.+"), &RepositoryCatalog);
    assert_matches!(
        result,
        Err(PluginError::Catalog(CatalogError::NoVersionResolvable { .. }))
    );
}

#[test]
fn play_21_application_without_jpa_is_left_alone() {
    let setup = TestSetup::new();
    setup.stage("start").stage("lib/play_2.10-2.1.3.jar");
    // No index is published: the repository must not be consulted

    let plugin = PlayJpaPlugin::new(setup.context("0.+"), &RepositoryCatalog).unwrap();
    assert_eq!(plugin.detect(), None);

    let mut downloader = CountingDownloader::default();
    plugin.compile(&mut downloader).unwrap();
    plugin.release();
    assert_eq!(downloader.calls, 0);
    assert!(!setup.app_dir.join(".lib").exists());
}

#[test]
fn non_play_application_is_left_alone() {
    let setup = TestSetup::new();
    setup.stage("WEB-INF/lib/play-java-jpa.jar");

    let plugin = PlayJpaPlugin::new(setup.context("0.+"), &RepositoryCatalog).unwrap();
    assert_eq!(plugin.detect(), None);
}
