//! VS Code build lookup
//!
//! Resolves the engine version either from the pinned vscode-version file in
//! the output directory, or by inspecting the official download redirect for
//! the latest build of a channel.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Pinned engine-version file read by the "current" engine mode
pub const VERSION_FILE: &str = "vscode-version";

/// Archive path embedded in the download redirect target:
/// `/{channel}/{commit}/VSCode-win32-x64-{version}.zip`
static DOWNLOAD_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(\w+)/([a-f0-9]{40})/VSCode-win32-x64-([\d.]+)\.zip")
        .expect("download path pattern")
});

/// Errors that can occur while resolving the engine version
#[derive(Debug, Error)]
pub enum VsCodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Lookup did not answer with a redirect
    #[error("Expected a redirect, got status {status}")]
    UnexpectedStatus { status: u16 },

    /// Redirect carried no usable Location header
    #[error("Redirect carried no usable Location header")]
    MissingLocation,

    /// Redirect target did not embed a build path
    #[error("Cannot extract vscode version from url {url}")]
    UnrecognizedUrl { url: String },

    /// Redirect target belongs to a different channel
    #[error("Redirect points at channel {actual}, expected {expected}")]
    ChannelMismatch { expected: String, actual: String },

    /// IO error reading the pinned version file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One published VS Code build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsCodeBuild {
    pub version: String,
    pub commit: String,
}

/// Look up the latest build of a release channel.
///
/// The Windows archive download link redirects to a URL embedding channel,
/// commit and version; the redirect is inspected without being followed.
pub fn latest_version(channel: &str) -> Result<VsCodeBuild, VsCodeError> {
    let client = Client::builder()
        .redirect(Policy::none())
        .timeout(Duration::from_secs(30))
        .user_agent(format!("vsix-mirror/{}", env!("CARGO_PKG_VERSION")))
        .build()?;

    let url = format!(
        "https://code.visualstudio.com/sha/download?build={}&os=win32-x64-archive",
        channel
    );
    let response = client.get(&url).send()?;

    let status = response.status();
    if status != StatusCode::FOUND {
        return Err(VsCodeError::UnexpectedStatus {
            status: status.as_u16(),
        });
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(VsCodeError::MissingLocation)?;

    parse_download_url(location, channel)
}

/// Extract channel, commit and version from a redirect target
fn parse_download_url(url: &str, channel: &str) -> Result<VsCodeBuild, VsCodeError> {
    let captures = DOWNLOAD_PATH
        .captures(url)
        .ok_or_else(|| VsCodeError::UnrecognizedUrl {
            url: url.to_string(),
        })?;

    if &captures[1] != channel {
        return Err(VsCodeError::ChannelMismatch {
            expected: channel.to_string(),
            actual: captures[1].to_string(),
        });
    }

    Ok(VsCodeBuild {
        version: captures[3].to_string(),
        commit: captures[2].to_string(),
    })
}

/// Read the engine version pinned in the output directory
pub fn pinned_version(output: &Path) -> Result<String, VsCodeError> {
    let contents = fs::read_to_string(output.join(VERSION_FILE))?;
    Ok(contents.trim().to_string())
}
