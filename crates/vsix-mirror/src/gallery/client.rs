//! Gallery HTTP client
//!
//! Provides a blocking HTTP client for the marketplace extension query
//! endpoint. One query carries a batch of extension identifiers.

use super::api::{
    self, flags, Criterion, ExtensionRecord, FilterType, QueryFilter, QueryRequest, QueryResponse,
};
use crate::resolver::ExtensionCatalog;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::collections::BTreeSet;
use std::fs;
use std::time::Duration;
use thiserror::Error;

/// Query endpoint of the Visual Studio Marketplace
pub const GALLERY_URL: &str =
    "https://marketplace.visualstudio.com/_apis/public/gallery/extensionquery";

/// API version negotiated through the Accept header
pub const ACCEPT_API_VERSION: &str = "application/json;api-version=3.0-preview.1";

/// Errors that can occur during gallery queries
#[derive(Debug, Error)]
pub enum GalleryError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Gallery answered with a non-success status
    #[error("Gallery returned status {status}")]
    Status { status: u16 },

    /// Request body could not be encoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Response did not match the expected query shape
    #[error("Unexpected gallery response ({source}): {body}")]
    UnexpectedShape {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error while writing debug dumps
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Client for the marketplace gallery
pub struct GalleryClient {
    /// HTTP client
    client: Client,

    /// Query endpoint URL
    url: String,

    /// Dump query.json / response.json into the working directory
    debug_dump: bool,
}

impl GalleryClient {
    /// Create a client against the public marketplace
    pub fn new() -> Result<Self, GalleryError> {
        Self::with_url(GALLERY_URL)
    }

    /// Create a client against a custom endpoint
    pub fn with_url(url: &str) -> Result<Self, GalleryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("vsix-mirror/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            debug_dump: false,
        })
    }

    /// Write query.json / response.json for every query
    pub fn with_debug_dump(mut self, debug_dump: bool) -> Self {
        self.debug_dump = debug_dump;
        self
    }

    /// Query metadata for a batch of extension identifiers.
    ///
    /// The request always scopes to the VS Code target, excludes unpublished
    /// extensions, and asks for asset URIs, version properties and
    /// category/tag lists. Identifiers the gallery does not know are simply
    /// absent from the result.
    pub fn query(&self, names: &BTreeSet<String>) -> Result<Vec<ExtensionRecord>, GalleryError> {
        let body = serde_json::to_string(&build_query(names))?;
        if self.debug_dump {
            fs::write("query.json", &body)?;
        }

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_API_VERSION)
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text()?;
        if self.debug_dump {
            fs::write("response.json", &text)?;
        }

        let parsed: QueryResponse = serde_json::from_str(&text)
            .map_err(|source| GalleryError::UnexpectedShape { body: text, source })?;

        Ok(parsed
            .results
            .into_iter()
            .flat_map(|set| set.extensions)
            .collect())
    }
}

impl ExtensionCatalog for GalleryClient {
    fn query(&self, names: &BTreeSet<String>) -> Result<Vec<ExtensionRecord>, GalleryError> {
        GalleryClient::query(self, names)
    }
}

/// Build the query request for a batch of extension identifiers
fn build_query(names: &BTreeSet<String>) -> QueryRequest {
    let mut criteria = vec![
        Criterion {
            filter_type: FilterType::Target,
            value: api::TARGET_VSCODE.to_string(),
        },
        Criterion {
            filter_type: FilterType::ExcludeWithFlags,
            value: flags::UNPUBLISHED.to_string(),
        },
    ];

    for name in names {
        criteria.push(Criterion {
            filter_type: FilterType::ExtensionName,
            value: name.clone(),
        });
    }

    QueryRequest {
        filters: vec![QueryFilter { criteria }],
        flags: flags::QUERY_DETAILS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_query_criteria() {
        let request = build_query(&names(&["ms-python.python", "rust-lang.rust-analyzer"]));

        assert_eq!(request.filters.len(), 1);
        let criteria = &request.filters[0].criteria;
        assert_eq!(criteria.len(), 4);
        assert_eq!(criteria[0].filter_type, FilterType::Target);
        assert_eq!(criteria[0].value, api::TARGET_VSCODE);
        assert_eq!(criteria[1].filter_type, FilterType::ExcludeWithFlags);
        assert_eq!(criteria[1].value, "4096");

        let requested: Vec<&str> = criteria[2..].iter().map(|c| c.value.as_str()).collect();
        assert_eq!(requested, ["ms-python.python", "rust-lang.rust-analyzer"]);
        assert!(criteria[2..]
            .iter()
            .all(|c| c.filter_type == FilterType::ExtensionName));
    }

    #[test]
    fn test_query_request_wire_shape() {
        let value = serde_json::to_value(build_query(&names(&["pub.ext"]))).unwrap();

        assert_eq!(value["flags"], 0x94);
        assert_eq!(value["filters"][0]["criteria"][0]["filterType"], 8);
        assert_eq!(value["filters"][0]["criteria"][1]["filterType"], 12);
        assert_eq!(value["filters"][0]["criteria"][2]["filterType"], 7);
        assert_eq!(value["filters"][0]["criteria"][2]["value"], "pub.ext");
    }
}
