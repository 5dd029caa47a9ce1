//! Artifact download
//!
//! Blocking HTTP download of VSIX artifacts, and the provider seam that
//! combines fetching with the on-disk store.

use crate::plan::ArtifactDescriptor;
use crate::store::{ArtifactStore, StoreError};
use reqwest::blocking::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// HTTP request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while downloading artifact bytes
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while providing artifacts locally
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Download failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Write or timestamp handling failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// A locally available artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedArtifact {
    /// On-disk location
    pub path: PathBuf,

    /// Whether the bytes were fetched by this call (false: already present)
    pub freshly_fetched: bool,
}

/// Fetch/storage boundary consumed by the resolver
pub trait ArtifactProvider {
    /// Make an artifact locally available, fetching it if the store lacks it
    fn ensure_local(
        &self,
        filename: &str,
        descriptor: &ArtifactDescriptor,
    ) -> Result<ProvidedArtifact, ProviderError>;
}

/// Blocking downloader for artifact bytes
pub struct ArtifactFetcher {
    client: Client,
}

impl ArtifactFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("vsix-mirror/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Download raw bytes from a URL
    pub fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// Fetcher + store composition used by real mirror runs
pub struct VsixDownloader {
    fetcher: ArtifactFetcher,
    store: ArtifactStore,
}

impl VsixDownloader {
    pub fn new(fetcher: ArtifactFetcher, store: ArtifactStore) -> Self {
        Self { fetcher, store }
    }
}

impl ArtifactProvider for VsixDownloader {
    fn ensure_local(
        &self,
        filename: &str,
        descriptor: &ArtifactDescriptor,
    ) -> Result<ProvidedArtifact, ProviderError> {
        let path = self.store.path(filename);
        if self.store.exists(filename) {
            println!("already downloaded: {}", path.display());
            return Ok(ProvidedArtifact {
                path,
                freshly_fetched: false,
            });
        }

        println!("downloading {}", path.display());
        let bytes = self.fetcher.download(&descriptor.url)?;
        self.store.write(filename, &bytes, &descriptor.last_updated)?;

        Ok(ProvidedArtifact {
            path,
            freshly_fetched: true,
        })
    }
}
