//! Download plan
//!
//! Accumulates the resolved artifacts of one mirror run: filename to
//! descriptor, the subset belonging to extension packs, and the identifiers
//! already queried.

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur while building the plan
#[derive(Debug, Error)]
pub enum PlanError {
    /// The same artifact resolved to two different descriptors
    #[error("Conflicting descriptors for {filename}: {existing:?} vs {incoming:?}")]
    DescriptorMismatch {
        filename: String,
        existing: Box<ArtifactDescriptor>,
        incoming: Box<ArtifactDescriptor>,
    },
}

/// Resolved download unit for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Chosen version string
    pub version: String,

    /// Declared engine range that qualified the version
    pub engine_range: String,

    /// Download URL of the artifact
    pub url: String,

    /// Publication timestamp (RFC 3339), used as the file mtime
    pub last_updated: String,
}

/// Accumulating plan for one resolution run.
///
/// A passive container: it owns no network or file-system logic. Keys are
/// ordered so iteration and output are deterministic.
#[derive(Debug, Default)]
pub struct DownloadPlan {
    artifacts: BTreeMap<String, ArtifactDescriptor>,
    packs: BTreeSet<String>,
    seen: BTreeSet<String>,
}

impl DownloadPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved artifact.
    ///
    /// Re-adding a structurally identical descriptor is a no-op. A different
    /// descriptor under a known filename is a consistency fault, never a
    /// silent overwrite.
    pub fn add(&mut self, filename: &str, descriptor: ArtifactDescriptor) -> Result<(), PlanError> {
        if let Some(existing) = self.artifacts.get(filename) {
            if *existing != descriptor {
                return Err(PlanError::DescriptorMismatch {
                    filename: filename.to_string(),
                    existing: Box::new(existing.clone()),
                    incoming: Box::new(descriptor),
                });
            }
            return Ok(());
        }

        self.artifacts.insert(filename.to_string(), descriptor);
        Ok(())
    }

    /// Mark an artifact as belonging to an "Extension Packs" extension
    pub fn mark_pack(&mut self, filename: &str) {
        self.packs.insert(filename.to_string());
    }

    pub fn is_pack(&self, filename: &str) -> bool {
        self.packs.contains(filename)
    }

    /// Record extension identifiers as queried
    pub fn note_seen<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.seen.extend(names);
    }

    pub fn is_seen(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Descriptor for a planned artifact
    pub fn descriptor(&self, filename: &str) -> Option<&ArtifactDescriptor> {
        self.artifacts.get(filename)
    }

    /// Planned artifacts in filename order
    pub fn artifacts(&self) -> impl Iterator<Item = (&str, &ArtifactDescriptor)> {
        self.artifacts.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Filenames of pack artifacts
    pub fn packs(&self) -> impl Iterator<Item = &str> {
        self.packs.iter().map(String::as_str)
    }

    /// Identifiers queried so far
    pub fn seen(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(version: &str) -> ArtifactDescriptor {
        ArtifactDescriptor {
            version: version.to_string(),
            engine_range: "^1.50.0".to_string(),
            url: format!("https://gallery.test/pub/ext/{}", version),
            last_updated: "2024-01-08T07:12:40.533Z".to_string(),
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let mut plan = DownloadPlan::new();
        plan.add("pub.ext-1.0.0.vsix", descriptor("1.0.0")).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan.descriptor("pub.ext-1.0.0.vsix").unwrap().version,
            "1.0.0"
        );
    }

    #[test]
    fn test_identical_re_add_is_a_no_op() {
        let mut plan = DownloadPlan::new();
        plan.add("pub.ext-1.0.0.vsix", descriptor("1.0.0")).unwrap();
        plan.add("pub.ext-1.0.0.vsix", descriptor("1.0.0")).unwrap();

        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_conflicting_re_add_faults() {
        let mut plan = DownloadPlan::new();
        plan.add("pub.ext-1.0.0.vsix", descriptor("1.0.0")).unwrap();

        let mut changed = descriptor("1.0.0");
        changed.last_updated = "2024-02-01T00:00:00Z".to_string();
        let err = plan.add("pub.ext-1.0.0.vsix", changed).unwrap_err();

        assert!(matches!(err, PlanError::DescriptorMismatch { .. }));
        // The original entry survives untouched.
        assert_eq!(
            plan.descriptor("pub.ext-1.0.0.vsix").unwrap().last_updated,
            "2024-01-08T07:12:40.533Z"
        );
    }

    #[test]
    fn test_pack_marking() {
        let mut plan = DownloadPlan::new();
        plan.add("pub.pack-1.0.0.vsix", descriptor("1.0.0")).unwrap();
        plan.mark_pack("pub.pack-1.0.0.vsix");

        assert!(plan.is_pack("pub.pack-1.0.0.vsix"));
        assert!(!plan.is_pack("pub.other-1.0.0.vsix"));
        assert_eq!(plan.packs().collect::<Vec<_>>(), ["pub.pack-1.0.0.vsix"]);
    }

    #[test]
    fn test_seen_tracking() {
        let mut plan = DownloadPlan::new();
        plan.note_seen(["pub.a".to_string(), "pub.b".to_string()]);
        plan.note_seen(["pub.b".to_string()]);

        assert!(plan.is_seen("pub.a"));
        assert!(!plan.is_seen("pub.c"));
        assert_eq!(plan.seen().count(), 2);
    }
}
