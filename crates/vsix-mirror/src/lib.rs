//! VSIX Mirror Library
//!
//! This crate mirrors Visual Studio Code extensions for offline use,
//! including:
//! - Gallery wire types and batched extension queries
//! - Engine-range matching and per-platform version selection
//! - Pack-closure resolution (extension packs expand to their members)
//! - Download planning with descriptor consistency checking
//! - Artifact download and mtime-stamped storage

pub mod commands;
pub mod config;
pub mod fetch;
pub mod gallery;
pub mod pack;
pub mod plan;
pub mod resolver;
pub mod selector;
pub mod semver;
pub mod store;
pub mod vscode;

pub use fetch::{ArtifactFetcher, ArtifactProvider, FetchError, ProvidedArtifact, VsixDownloader};
pub use gallery::{ExtensionRecord, GalleryClient, GalleryError, Property, Publisher, VersionRecord};
pub use pack::{PackError, PackManifestSource, VsixManifestReader};
pub use plan::{ArtifactDescriptor, DownloadPlan, PlanError};
pub use resolver::{
    ExtensionCatalog, FetchStats, PackClosureResolver, Resolution, ResolveError, DEFAULT_PLATFORMS,
};
pub use selector::{select, SelectedArtifact, SelectorError};
pub use semver::{EngineRange, SemverError, Version};
pub use store::{ArtifactStore, StoreError};
pub use vscode::{VsCodeBuild, VsCodeError};
