//! Gallery API types
//!
//! Request and response shapes for the marketplace extension query endpoint,
//! plus the integer filter and flag constants of that wire contract.

use serde::{Deserialize, Serialize, Serializer};

/// Installation target identifying VS Code proper
pub const TARGET_VSCODE: &str = "Microsoft.VisualStudio.Code";

/// Category marking an extension as a pack of other extensions
pub const CATEGORY_EXTENSION_PACK: &str = "Extension Packs";

/// Version property carrying the declared engine range
pub const PROP_ENGINE: &str = "Microsoft.VisualStudio.Code.Engine";

/// Version property flagging a pre-release build
pub const PROP_PRERELEASE: &str = "Microsoft.VisualStudio.Code.PreRelease";

/// Criterion kinds understood by the query endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FilterType {
    Tag = 1,
    ExtensionId = 4,
    Category = 5,
    ExtensionName = 7,
    Target = 8,
    Featured = 9,
    SearchText = 10,
    ExcludeWithFlags = 12,
}

impl Serialize for FilterType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(*self as u32)
    }
}

/// Response-detail flags of the query endpoint (bitmask)
pub mod flags {
    pub const NONE: u32 = 0x0;
    pub const INCLUDE_VERSIONS: u32 = 0x1;
    pub const INCLUDE_FILES: u32 = 0x2;
    pub const INCLUDE_CATEGORY_AND_TAGS: u32 = 0x4;
    pub const INCLUDE_SHARED_ACCOUNTS: u32 = 0x8;
    pub const INCLUDE_VERSION_PROPERTIES: u32 = 0x10;
    pub const EXCLUDE_NON_VALIDATED: u32 = 0x20;
    pub const INCLUDE_INSTALLATION_TARGETS: u32 = 0x40;
    pub const INCLUDE_ASSET_URI: u32 = 0x80;
    pub const INCLUDE_STATISTICS: u32 = 0x100;
    pub const INCLUDE_LATEST_VERSION_ONLY: u32 = 0x200;
    pub const UNPUBLISHED: u32 = 0x1000;
    pub const INCLUDE_NAME_CONFLICT_INFO: u32 = 0x8000;

    /// Detail set requested on every query: asset URIs, version properties
    /// and category/tag lists.
    pub const QUERY_DETAILS: u32 =
        INCLUDE_ASSET_URI | INCLUDE_VERSION_PROPERTIES | INCLUDE_CATEGORY_AND_TAGS;
}

/// Extension query request body
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub filters: Vec<QueryFilter>,
    pub flags: u32,
}

/// One filter of a query: a list of criteria combined by the gallery
#[derive(Debug, Clone, Serialize)]
pub struct QueryFilter {
    pub criteria: Vec<Criterion>,
}

/// A single filter criterion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub filter_type: FilterType,
    pub value: String,
}

/// Extension query response body
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<ResultSet>,
}

/// One result set of a query response
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub extensions: Vec<ExtensionRecord>,
}

/// One extension as returned by the gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    pub publisher: Publisher,

    /// Extension name without the publisher part
    pub extension_name: String,

    /// Category tags ("Programming Languages", "Extension Packs", ...)
    #[serde(default)]
    pub categories: Vec<String>,

    /// Published versions, newest first as served by the gallery
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
}

/// Publisher of an extension
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub publisher_name: String,
}

/// One published version of an extension
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub version: String,

    /// Validation state; only "validated" and "none" are legitimate
    pub flags: String,

    /// Platform tag ("linux-x64", ...); absent on platform-agnostic builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_platform: Option<String>,

    /// Key/value properties (engine range, pre-release marker, ...)
    #[serde(default)]
    pub properties: Vec<Property>,

    /// Base URI of this version's assets
    pub asset_uri: String,

    /// Publication timestamp of this version (RFC 3339)
    pub last_updated: String,
}

/// A key/value property on a version record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl ExtensionRecord {
    /// Verbatim `publisher.name` identifier (case preserved)
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.publisher.publisher_name, self.extension_name)
    }

    /// Whether this extension is categorized as an extension pack
    pub fn is_pack(&self) -> bool {
        self.categories.iter().any(|c| c == CATEGORY_EXTENSION_PACK)
    }
}

impl VersionRecord {
    /// Look up a property value by key
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}
