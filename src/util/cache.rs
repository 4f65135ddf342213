use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

use crate::util::fetch::{self, FetchError};
use crate::util::logger::Logger;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("Unable to download {uri}: {source}")]
    Fetch {
        uri: String,
        #[source]
        source: FetchError,
    },
    #[error("Unable to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Logging Error: {0}")]
    Log(anyhow::Error),
}

/// Fetches jars into a target directory.
pub trait Downloader {
    fn download_jar(
        &mut self,
        version: &str,
        uri: &str,
        description: &str,
        jar_name: &str,
        target_directory: &Path,
    ) -> Result<(), DownloadError>;
}

/// A download cache keyed by URI. Each artifact is fetched at most once per cache directory.
pub struct ApplicationCache<L: Logger> {
    cache_dir: PathBuf,
    logger: L,
}

impl<L: Logger> ApplicationCache<L> {
    pub fn new(cache_dir: impl Into<PathBuf>, logger: L) -> Self {
        ApplicationCache {
            cache_dir: cache_dir.into(),
            logger,
        }
    }

    pub fn cached_file(&self, uri: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.cached", fetch::sha256(uri.as_bytes())))
    }

    /// The cached copy of `uri`, downloading it first on a miss.
    pub fn get(&mut self, uri: &str) -> Result<PathBuf, DownloadError> {
        let cached = self.cached_file(uri);
        if cached.is_file() {
            self.logger
                .debug(format!("Using cached copy of {}", uri))
                .map_err(DownloadError::Log)?;
            return Ok(cached);
        }

        fs::create_dir_all(&self.cache_dir).map_err(|source| DownloadError::Io {
            path: self.cache_dir.clone(),
            source,
        })?;
        let data = fetch::get_bytes(uri).map_err(|source| DownloadError::Fetch {
            uri: uri.to_string(),
            source,
        })?;

        // Written beside the final file and renamed so readers never see a partial download
        let io_error = |source| DownloadError::Io {
            path: cached.clone(),
            source,
        };
        let mut partial = NamedTempFile::new_in(&self.cache_dir).map_err(io_error)?;
        partial.write_all(&data).map_err(io_error)?;
        partial
            .persist(&cached)
            .map_err(|e| io_error(e.error))?;
        Ok(cached)
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }
}

impl<L: Logger> Downloader for ApplicationCache<L> {
    fn download_jar(
        &mut self,
        version: &str,
        uri: &str,
        description: &str,
        jar_name: &str,
        target_directory: &Path,
    ) -> Result<(), DownloadError> {
        let started = Instant::now();
        self.logger
            .info(format!(
                "---> Downloading {} {} from {}",
                description, version, uri
            ))
            .map_err(DownloadError::Log)?;

        let cached = self.get(uri)?;
        let target = target_directory.join(jar_name);
        fs::create_dir_all(target_directory).map_err(|source| DownloadError::Io {
            path: target_directory.to_path_buf(),
            source,
        })?;
        fs::copy(&cached, &target).map_err(|source| DownloadError::Io {
            path: target.clone(),
            source,
        })?;

        self.logger
            .info(format!(
                "---> Installed {} ({:.1}s)",
                target.display(),
                started.elapsed().as_secs_f64()
            ))
            .map_err(DownloadError::Log)
    }
}
