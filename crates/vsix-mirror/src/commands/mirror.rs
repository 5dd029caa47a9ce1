//! Mirror command
//!
//! Resolves the engine version, runs the pack-closure resolution against the
//! gallery, and reports what was downloaded.

use crate::config::{self, ConfigError};
use crate::fetch::{ArtifactFetcher, FetchError, VsixDownloader};
use crate::gallery::client::{GalleryClient, GalleryError};
use crate::pack::VsixManifestReader;
use crate::resolver::{PackClosureResolver, ResolveError};
use crate::semver::{SemverError, Version};
use crate::store::{ArtifactStore, StoreError};
use crate::vscode::{self, VsCodeError};
use std::path::PathBuf;
use thiserror::Error;

/// Release channel used when looking up the latest engine build
const LATEST_CHANNEL: &str = "stable";

/// Errors that can occur during a mirror run
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Config file error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Engine-version lookup error
    #[error("VS Code lookup error: {0}")]
    VsCode(#[from] VsCodeError),

    /// Engine version did not parse
    #[error("Engine version error: {0}")]
    Engine(#[from] SemverError),

    /// Gallery client could not be built
    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

    /// Artifact fetcher could not be built
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Destination directory error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resolution error
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Options for one mirror run
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Output directory holding the per-engine destination
    pub output: PathBuf,

    /// Engine selector: "latest", "current", or a literal version
    pub engine: String,

    /// Optional config file seeding the extension list
    pub conf: Option<PathBuf>,

    /// Target platforms
    pub platforms: Vec<String>,

    /// Extension identifiers from the command line
    pub extensions: Vec<String>,

    /// Dump gallery queries and responses
    pub verbose: bool,
}

/// Summary of one mirror run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorReport {
    /// Artifacts in the final plan
    pub artifacts: usize,

    /// Artifacts fetched during this run
    pub downloaded: usize,

    /// Artifacts already present on disk
    pub cached: usize,

    /// Artifacts belonging to extension packs
    pub packs: usize,
}

/// Mirror all requested extensions, expanding extension packs.
///
/// Artifacts land in `{output}/vscode-extensions-{engine}`; files already
/// there are kept as completed downloads.
pub fn mirror_extensions(options: MirrorOptions) -> Result<MirrorReport, MirrorError> {
    let mut extensions = options.extensions.clone();
    if let Some(conf) = &options.conf {
        extensions.extend(config::read_extension_list(conf)?);
    }

    let engine_str = match options.engine.as_str() {
        "latest" => {
            let build = vscode::latest_version(LATEST_CHANNEL)?;
            println!(
                "Using VSCode {} {} {}",
                build.version, build.commit, LATEST_CHANNEL
            );
            build.version
        }
        "current" => {
            let version = vscode::pinned_version(&options.output)?;
            println!("Using vscode {}", version);
            version
        }
        literal => literal.to_string(),
    };
    let engine = Version::parse(&engine_str)?;

    let dest = options
        .output
        .join(format!("vscode-extensions-{}", engine_str));
    let store = ArtifactStore::init(&dest)?;

    let catalog = GalleryClient::new()?.with_debug_dump(options.verbose);
    let downloader = VsixDownloader::new(ArtifactFetcher::new()?, store);
    let manifests = VsixManifestReader;

    let resolution = PackClosureResolver::new(&catalog, &downloader, &manifests, engine)
        .with_platforms(options.platforms.clone())
        .run(extensions)?;

    let report = MirrorReport {
        artifacts: resolution.plan.len(),
        downloaded: resolution.stats.downloaded,
        cached: resolution.stats.cached,
        packs: resolution.plan.packs().count(),
    };

    println!(
        "\n{} artifacts ({} downloaded, {} already present, {} packs) in {}",
        report.artifacts,
        report.downloaded,
        report.cached,
        report.packs,
        dest.display()
    );

    Ok(report)
}
