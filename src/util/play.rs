//! Conventions for locating a staged Play application.
//!
//! A staged Play application is rooted at the directory holding its `start` script. Play 2.0
//! applications keep their jars in `staged/`, later versions in `lib/`.

use glob::Pattern;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::util::files::{find_first, find_named};

pub const START_SCRIPT: &str = "start";
const PLAY_JAR: &str = "*play_*.jar";

#[derive(thiserror::Error, Debug)]
pub enum FrameworkError {
    #[error("Play application in {app_dir} has more than one start script: {roots:?}")]
    AmbiguousRoot { app_dir: PathBuf, roots: Vec<PathBuf> },
}

/// The root of the Play application staged in `app_dir`, if there is one.
pub fn root(app_dir: &Path) -> Result<Option<PathBuf>, FrameworkError> {
    let mut roots: Vec<PathBuf> = find_named(app_dir, START_SCRIPT)
        .into_iter()
        .filter_map(|script| script.parent().map(Path::to_path_buf))
        .collect();
    roots.sort();

    match roots.len() {
        0 | 1 => Ok(roots.pop()),
        _ => Err(FrameworkError::AmbiguousRoot {
            app_dir: app_dir.to_path_buf(),
            roots,
        }),
    }
}

pub fn lib(root: &Path) -> PathBuf {
    root.join("lib")
}

pub fn staged(root: &Path) -> PathBuf {
    root.join("staged")
}

/// The Play version, taken from the name of the Play jar in `lib/` or `staged/`.
pub fn version(root: &Path) -> Option<String> {
    let pattern = Pattern::new(PLAY_JAR).ok()?;
    let play_jar = find_first(&lib(root), &pattern).or_else(|| find_first(&staged(root), &pattern))?;
    version_from_jar_name(play_jar.file_name()?.to_str()?)
}

// play_2.9.1-2.0.4.jar => 2.0.4
fn version_from_jar_name(name: &str) -> Option<String> {
    Regex::new(r"^.*play_.*-(.+)\.jar$")
        .ok()?
        .captures(name)?
        .get(1)
        .map(|m| m.as_str().to_string())
}
