use sha2::Digest;
use std::path::PathBuf;
use std::{fs, io};

const FILE_SCHEME: &str = "file://";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unable to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Response is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Fetch the body of `uri` as text. `file://` URIs are read from the local filesystem.
pub fn get(uri: impl AsRef<str>) -> Result<String, FetchError> {
    Ok(String::from_utf8(get_bytes(uri)?)?)
}

/// Fetch the raw body of `uri`, failing on any non-success HTTP status.
pub fn get_bytes(uri: impl AsRef<str>) -> Result<Vec<u8>, FetchError> {
    let uri = uri.as_ref();
    if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
        let path = PathBuf::from(path);
        return fs::read(&path).map_err(|source| FetchError::File { path, source });
    }

    let response = reqwest::blocking::get(uri)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

pub fn sha256(data: &[u8]) -> String {
    format!("{:x}", sha2::Sha256::digest(data))
}
