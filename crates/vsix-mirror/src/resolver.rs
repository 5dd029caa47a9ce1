//! Pack closure resolution
//!
//! Iterates the requested extension set to a fixpoint: query the gallery for
//! the current frontier, select one artifact per extension and platform, make
//! the artifacts locally available, and feed the members of every extension
//! pack back into the frontier until nothing new appears.

use crate::fetch::{ArtifactProvider, ProviderError};
use crate::gallery::api::ExtensionRecord;
use crate::gallery::client::GalleryError;
use crate::pack::{PackError, PackManifestSource};
use crate::plan::{DownloadPlan, PlanError};
use crate::selector::{self, SelectorError};
use crate::semver::Version;
use std::collections::BTreeSet;
use thiserror::Error;

/// Platforms mirrored when none are requested explicitly
pub const DEFAULT_PLATFORMS: &[&str] = &["linux-x64", "linux-arm64"];

/// Upper bound on closure rounds. Real packs nest a handful of levels at
/// most; hitting this means the catalog is feeding us an unbounded frontier.
pub const DEFAULT_MAX_ROUNDS: usize = 32;

/// Catalog boundary: batched metadata lookup by extension identifier
pub trait ExtensionCatalog {
    fn query(&self, names: &BTreeSet<String>) -> Result<Vec<ExtensionRecord>, GalleryError>;
}

/// Errors that can occur during closure resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Catalog query failed
    #[error("Gallery error: {0}")]
    Gallery(#[from] GalleryError),

    /// Version selection failed
    #[error("Selection error: {0}")]
    Selection(#[from] SelectorError),

    /// Plan consistency fault
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Artifact could not be made locally available
    #[error("Download error: {0}")]
    Provider(#[from] ProviderError),

    /// Pack manifest could not be read
    #[error("Pack manifest error: {0}")]
    Pack(#[from] PackError),

    /// The frontier kept producing new identifiers past the round cap
    #[error("Pack expansion did not settle within {rounds} rounds")]
    IterationLimit { rounds: usize },
}

/// Download/cache counters for one resolution run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchStats {
    pub downloaded: usize,
    pub cached: usize,
}

/// Outcome of one resolution run
#[derive(Debug)]
pub struct Resolution {
    pub plan: DownloadPlan,
    pub stats: FetchStats,
}

/// Breadth-first fixpoint over pack membership.
///
/// Only "Extension Packs"-categorized extensions contribute new frontier
/// members; ordinary extension dependencies are not followed.
pub struct PackClosureResolver<'a, C, P, M> {
    catalog: &'a C,
    provider: &'a P,
    manifests: &'a M,
    engine: Version,
    platforms: Vec<String>,
    max_rounds: usize,
}

impl<'a, C, P, M> PackClosureResolver<'a, C, P, M>
where
    C: ExtensionCatalog,
    P: ArtifactProvider,
    M: PackManifestSource,
{
    /// Create a resolver for one engine version
    pub fn new(catalog: &'a C, provider: &'a P, manifests: &'a M, engine: Version) -> Self {
        Self {
            catalog,
            provider,
            manifests,
            engine,
            platforms: DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the target platforms
    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the round cap
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Resolve the closure of the seed identifiers.
    ///
    /// Each round issues one batched catalog query for the frontier, selects
    /// an artifact per returned extension and platform, makes this round's
    /// artifacts locally available, and seeds the next frontier with pack
    /// members not yet seen. Identifiers the catalog does not answer for are
    /// skipped; every other fault aborts the run.
    pub fn run<I>(&self, seeds: I) -> Result<Resolution, ResolveError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut plan = DownloadPlan::new();
        let mut stats = FetchStats::default();
        let mut frontier: BTreeSet<String> = seeds.into_iter().collect();
        let mut rounds = 0;

        while !frontier.is_empty() {
            rounds += 1;
            if rounds > self.max_rounds {
                return Err(ResolveError::IterationLimit {
                    rounds: self.max_rounds,
                });
            }

            let records = self.catalog.query(&frontier)?;

            let mut round_files = BTreeSet::new();
            for record in &records {
                for platform in &self.platforms {
                    let selected = selector::select(record, platform, &self.engine)?;
                    plan.add(&selected.filename, selected.descriptor)?;
                    if record.is_pack() {
                        plan.mark_pack(&selected.filename);
                    }
                    round_files.insert(selected.filename);
                }
            }

            plan.note_seen(frontier);

            // Packs can only be expanded once their archive is on disk.
            let mut members = BTreeSet::new();
            for filename in &round_files {
                let provided = match plan.descriptor(filename) {
                    Some(descriptor) => self.provider.ensure_local(filename, descriptor)?,
                    None => continue,
                };

                if provided.freshly_fetched {
                    stats.downloaded += 1;
                } else {
                    stats.cached += 1;
                }

                if plan.is_pack(filename) {
                    members.extend(self.manifests.members(&provided.path)?);
                }
            }

            frontier = members
                .into_iter()
                .filter(|name| !plan.is_seen(name))
                .collect();
        }

        Ok(Resolution { plan, stats })
    }
}
