//! Version selection
//!
//! Picks, for one extension and one target platform, the newest published
//! version compatible with the engine, and derives the artifact filename and
//! download URL.

use crate::gallery::api::{ExtensionRecord, VersionRecord, PROP_ENGINE, PROP_PRERELEASE};
use crate::plan::ArtifactDescriptor;
use crate::semver::{EngineRange, SemverError, Version};
use thiserror::Error;

/// Asset path appended to a version's base URI to address the VSIX package
pub const VSIX_ASSET: &str = "/Microsoft.VisualStudio.Services.VSIXPackage";

/// Validation states a version record may legitimately carry
const ACCEPTED_FLAGS: [&str; 2] = ["validated", "none"];

/// Errors that can occur during version selection
#[derive(Debug, Error)]
pub enum SelectorError {
    /// A version record carried an unknown validation state
    #[error("Unexpected validation flags '{flags}' on {extension}: {record}")]
    UnexpectedValidationFlags {
        extension: String,
        flags: String,
        record: String,
    },

    /// A version or caret engine-range string failed to parse
    #[error(transparent)]
    Version(#[from] SemverError),

    /// No published version satisfies platform, engine and release constraints
    #[error("No version of {extension} for {platform} is compatible with engine {engine}")]
    NoCompatibleVersion {
        extension: String,
        platform: String,
        engine: String,
    },

    /// A URL override cannot serve the requested platform
    #[error("No {extension} build for platform {platform}")]
    UnsupportedPlatform {
        extension: String,
        platform: String,
    },
}

/// Outcome of selecting one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedArtifact {
    /// Artifact filename: identifier, optional platform tag, version
    pub filename: String,
    pub descriptor: ArtifactDescriptor,
}

/// Select the artifact for one extension on one target platform.
///
/// Versions are admitted when their validation state is legitimate, their
/// platform tag (if any) matches, they are not flagged pre-release, and their
/// declared engine range admits the engine. The greatest admissible version
/// wins. Platform-agnostic versions keep an untagged filename even though a
/// specific platform was requested.
pub fn select(
    record: &ExtensionRecord,
    platform: &str,
    engine: &Version,
) -> Result<SelectedArtifact, SelectorError> {
    let name = record.identifier();

    struct Candidate<'a> {
        parsed: Version,
        record: &'a VersionRecord,
        engine_range: &'a str,
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for version in &record.versions {
        if !ACCEPTED_FLAGS.contains(&version.flags.as_str()) {
            return Err(SelectorError::UnexpectedValidationFlags {
                extension: name,
                flags: version.flags.clone(),
                record: serde_json::to_string_pretty(version).unwrap_or_default(),
            });
        }
        if version
            .target_platform
            .as_deref()
            .is_some_and(|tag| tag != platform)
        {
            continue;
        }
        if version.property(PROP_PRERELEASE) == Some("true") {
            continue;
        }
        let Some(engine_range) = version.property(PROP_ENGINE) else {
            continue;
        };
        if !EngineRange::parse(engine_range)?.matches(engine) {
            continue;
        }

        candidates.push(Candidate {
            parsed: Version::parse(&version.version)?,
            record: version,
            engine_range,
        });
    }

    let Some(best) = candidates.into_iter().max_by(|a, b| a.parsed.cmp(&b.parsed)) else {
        return Err(SelectorError::NoCompatibleVersion {
            extension: name,
            platform: platform.to_string(),
            engine: engine.to_string(),
        });
    };

    let chosen = best.record;
    let mut url = format!("{}{}", chosen.asset_uri, VSIX_ASSET);
    let mut target_platform = chosen.target_platform.clone();

    if let Some(rewrite) = url_override(&name) {
        let target = rewrite(&name, &chosen.version, platform)?;
        url = target.url;
        target_platform = Some(target.platform);
    }

    let filename = match &target_platform {
        Some(tag) => format!("{}-{}-{}.vsix", name, tag, chosen.version),
        None => format!("{}-{}.vsix", name, chosen.version),
    };

    Ok(SelectedArtifact {
        filename,
        descriptor: ArtifactDescriptor {
            version: chosen.version.clone(),
            engine_range: best.engine_range.to_string(),
            url,
            last_updated: chosen.last_updated.clone(),
        },
    })
}

/// Download target produced by a per-identifier override
#[derive(Debug)]
struct OverrideTarget {
    url: String,
    platform: String,
}

type OverrideFn = fn(&str, &str, &str) -> Result<OverrideTarget, SelectorError>;

/// Extensions whose binaries are published outside the gallery.
///
/// The generic path serves the gallery asset URI; entries here map the chosen
/// version and requested platform to a concrete URL and platform tag. New
/// one-offs are added to this table, never to the selection pipeline.
const URL_OVERRIDES: &[(&str, OverrideFn)] = &[("vadimcn.vscode-lldb", codelldb_release)];

fn url_override(name: &str) -> Option<OverrideFn> {
    URL_OVERRIDES
        .iter()
        .find(|(id, _)| *id == name)
        .map(|(_, rewrite)| *rewrite)
}

/// codelldb ships its VSIX from GitHub releases under {arch}-{os} naming
fn codelldb_release(
    extension: &str,
    version: &str,
    platform: &str,
) -> Result<OverrideTarget, SelectorError> {
    let unsupported = || SelectorError::UnsupportedPlatform {
        extension: extension.to_string(),
        platform: platform.to_string(),
    };

    let (os, arch) = platform.split_once('-').ok_or_else(unsupported)?;
    let arch = match arch {
        "x64" => "x86_64",
        "arm64" => "aarch64",
        _ => return Err(unsupported()),
    };

    Ok(OverrideTarget {
        url: format!(
            "https://github.com/vadimcn/vscode-lldb/releases/download/v{}/codelldb-{}-{}.vsix",
            version, arch, os
        ),
        platform: platform.to_string(),
    })
}
