use std::borrow::Cow;
use std::path::Path;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(StatusCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Malformed location: {0}")]
    MalformedLocation(String),
}

/// Fetches a single asset to tell whether a style directory is populated
///
/// Implementations block until they know the answer.
pub trait AssetProbe: Send + Sync {
    fn fetch(&self, location: &str) -> Result<(), ProbeError>;
}

/// Probe for local paths, `file://` URLs and `http(s)://` URLs
#[derive(Debug, Default)]
pub struct DefaultProbe {
    http: OnceCell<Client>,
}

impl DefaultProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client, ProbeError> {
        self.http
            .get_or_try_init(|| Client::builder().build().map_err(ProbeError::Network))
    }

    fn fetch_http(&self, url: &str) -> Result<(), ProbeError> {
        let response = self.client()?.get(url).send()?;
        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(ProbeError::Status(response.status()))
        }
    }
}

impl AssetProbe for DefaultProbe {
    fn fetch(&self, location: &str) -> Result<(), ProbeError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_http(location)
        } else {
            fetch_file(&local_path(location)?)
        }
    }
}

/// Filesystem path for a plain path or a `file://` URL
pub fn local_path(location: &str) -> Result<Cow<'_, str>, ProbeError> {
    match location.strip_prefix("file://") {
        Some(rest) => urlencoding::decode(rest)
            .map_err(|_| ProbeError::MalformedLocation(location.to_string())),
        None => Ok(Cow::Borrowed(location)),
    }
}

fn fetch_file(path: &str) -> Result<(), ProbeError> {
    let file = std::fs::File::open(Path::new(path))?;
    if file.metadata()?.is_file() {
        Ok(())
    } else {
        Err(ProbeError::NotAFile(path.to_string()))
    }
}
