use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::{env, process};

use crate::build::compile_plugin;
use crate::data::buildpack_toml::PlayJpaPluginBuildpackMetadata;
use crate::plugin::{lib_directory, ApplicationContext, PlayJpaPlugin};
use crate::repository::RepositoryCatalog;
use crate::util::config::{resolve_configuration, PluginConfiguration, PluginConfigurationOverrides};
use crate::util::logger::{BuildLogger, Logger};

const CACHE_DIRECTORY: &str = "play-jpa-plugin-cache";

pub fn cli() {
    if self::execute(env::args().collect()).is_err() {
        process::exit(1);
    }
}

fn pack_command(name: &'static str, about: &'static str) -> Command<'static> {
    Command::new(name)
        .about(about)
        .arg_required_else_help(true)
        .arg(
            Arg::new("source")
                .help("path to the staged application directory")
                .required(true),
        )
        .arg(
            Arg::new("plugin_version")
                .help("Version constraint for the plugin, e.g. 0.+ (overrides app.toml)")
                .takes_value(true)
                .long("plugin-version")
                .short('v'),
        )
        .arg(
            Arg::new("repository_root")
                .help("URI of the repository holding the plugin index.yml (overrides app.toml)")
                .takes_value(true)
                .long("repository-root")
                .short('r'),
        )
}

pub fn execute(args: Vec<String>) -> Result<(), anyhow::Error> {
    let app = Command::new("Play JPA Plugin Buildpack CLI")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("pack")
                .about("Buildpack commands")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(pack_command(
                    "detect",
                    "Detect whether the application needs the Play JPA plugin",
                ))
                .subcommand(
                    pack_command("compile", "Download the Play JPA plugin for the application")
                        .arg(
                            Arg::new("lib")
                                .help("directory the plugin jar is placed in, defaults to <source>/.lib")
                                .takes_value(true)
                                .long("lib")
                                .short('l'),
                        )
                        .arg(
                            Arg::new("cache")
                                .help("path to a directory able to cache downloads")
                                .takes_value(true)
                                .long("cache")
                                .short('c'),
                        ),
                )
                .subcommand(pack_command(
                    "release",
                    "Release the application (the plugin contributes nothing at runtime)",
                )),
        );

    let matches = app.try_get_matches_from(args)?;
    match matches.subcommand() {
        Some(("pack", matches)) => match matches.subcommand() {
            Some(("detect", matches)) => detect(matches),
            Some(("compile", matches)) => compile(matches),
            Some(("release", matches)) => release(matches),
            Some((name, _)) => Err(anyhow!("pack subcommand {} not supported", name)),
            None => Err(anyhow!("pack subcommand missing")),
        },
        Some((name, _)) => Err(anyhow!("Command {} not supported", name)),
        None => Err(anyhow!("cli command missing")),
    }
}

/// Application directory and configuration: `buildpack.toml` defaults, then `app.toml`, then flags.
fn init(args: &ArgMatches) -> Result<(PathBuf, PluginConfiguration), anyhow::Error> {
    let app_dir = match args.value_of("source") {
        Some(s) => PathBuf::from(s),
        None => env::current_dir()?,
    };

    let metadata = PlayJpaPluginBuildpackMetadata::embedded()?;
    let overrides = PluginConfigurationOverrides {
        version: args.value_of("plugin_version").map(String::from),
        repository_root: args.value_of("repository_root").map(String::from),
    };
    let configuration = resolve_configuration(&app_dir, &metadata.play_jpa_plugin)?
        .with_overrides(&overrides)
        .validate()?;

    Ok((app_dir, configuration))
}

fn detect(args: &ArgMatches) -> Result<(), anyhow::Error> {
    let mut logger = BuildLogger::new(true, false);
    logger.header("Pack Detect")?;

    let (app_dir, configuration) = init(args)?;
    logger.debug(format!(
        "Resolving {} against {}",
        configuration.version, configuration.repository_root
    ))?;

    match crate::detect::detect_plugin(&app_dir, configuration) {
        Ok(Some(id)) => logger.info(format!(
            "App in {} is suitable for buildpack: {}",
            app_dir.display(),
            id
        )),
        Ok(None) => logger.error(
            "App not suitable",
            anyhow!("App in {} does not need the Play JPA plugin", app_dir.display()),
        ),
        Err(e) => logger.error("Unexpected error during detect", e),
    }
}

fn compile(args: &ArgMatches) -> Result<(), anyhow::Error> {
    let mut logger = BuildLogger::new(true, false);
    logger.header("Pack Compile")?;

    let (app_dir, configuration) = init(args)?;
    let lib = match args.value_of("lib") {
        Some(s) => PathBuf::from(s),
        None => lib_directory(&app_dir),
    };
    let cache = match args.value_of("cache") {
        Some(s) => PathBuf::from(s),
        None => env::temp_dir().join(CACHE_DIRECTORY),
    };

    match compile_plugin(
        &app_dir,
        configuration,
        lib.clone(),
        &cache,
        BuildLogger::new(true, false),
    ) {
        Ok(Some(id)) => logger.info(format!("Installed {} into {}", id, lib.display())),
        Ok(None) => logger.info(format!(
            "App in {} does not need the Play JPA plugin",
            app_dir.display()
        )),
        Err(e) => logger.error("Unexpected error during compile", e),
    }
}

fn release(args: &ArgMatches) -> Result<(), anyhow::Error> {
    let mut logger = BuildLogger::new(true, false);
    logger.header("Pack Release")?;

    let (app_dir, configuration) = init(args)?;
    let context = ApplicationContext {
        lib_directory: lib_directory(&app_dir),
        app_dir,
        configuration,
    };

    match PlayJpaPlugin::new(context, &RepositoryCatalog) {
        Ok(plugin) => {
            plugin.release();
            logger.info("Nothing to release")
        }
        Err(e) => logger.error("Unexpected error during release", e),
    }
}
