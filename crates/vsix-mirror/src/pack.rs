//! Pack manifests
//!
//! Reads the member list of an extension pack out of its VSIX archive. A
//! VSIX is a zip; the member identifiers live in the "extensionPack" array
//! of extension/package.json.

use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Path of the extension manifest inside a VSIX archive
pub const MANIFEST_PATH: &str = "extension/package.json";

/// Errors that can occur while reading pack manifests
#[derive(Debug, Error)]
pub enum PackError {
    /// IO error opening the archive
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Archive could not be read as a zip or lacks the manifest entry
    #[error("Failed to read archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Manifest entry is not valid JSON
    #[error("Failed to parse extension manifest: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A pack archive declares no member list
    #[error("{path} has no extensionPack entry in its manifest")]
    MissingMemberList { path: PathBuf },
}

/// Manifest fields relevant to pack expansion
#[derive(Debug, Deserialize)]
struct PackManifest {
    #[serde(rename = "extensionPack")]
    extension_pack: Option<Vec<String>>,
}

/// Pack-manifest boundary consumed by the resolver
pub trait PackManifestSource {
    /// Member extension identifiers declared by the pack archive at `path`
    fn members(&self, path: &Path) -> Result<Vec<String>, PackError>;
}

/// Reads member lists from VSIX archives on disk
#[derive(Debug, Default, Clone, Copy)]
pub struct VsixManifestReader;

impl PackManifestSource for VsixManifestReader {
    fn members(&self, path: &Path) -> Result<Vec<String>, PackError> {
        let file = fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut entry = archive.by_name(MANIFEST_PATH)?;

        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;

        let manifest: PackManifest = serde_json::from_str(&contents)?;
        manifest
            .extension_pack
            .ok_or_else(|| PackError::MissingMemberList {
                path: path.to_path_buf(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_vsix(dir: &Path, name: &str, manifest: &str) -> PathBuf {
        let path = dir.join(name);
        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(MANIFEST_PATH, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(manifest.as_bytes()).unwrap();
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_members_from_pack_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vsix(
            dir.path(),
            "pub.pack-1.0.0.vsix",
            r#"{
                "name": "pack",
                "publisher": "pub",
                "extensionPack": ["ms-python.python", "ms-toolsai.jupyter"]
            }"#,
        );

        let members = VsixManifestReader.members(&path).unwrap();
        assert_eq!(members, ["ms-python.python", "ms-toolsai.jupyter"]);
    }

    #[test]
    fn test_missing_member_list_faults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_vsix(
            dir.path(),
            "pub.notapack-1.0.0.vsix",
            r#"{ "name": "notapack", "publisher": "pub" }"#,
        );

        let err = VsixManifestReader.members(&path).unwrap_err();
        assert!(matches!(err, PackError::MissingMemberList { .. }));
    }

    #[test]
    fn test_missing_manifest_entry_faults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pub.empty-1.0.0.vsix");
        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("extension/README.md", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"readme").unwrap();
        writer.finish().unwrap();

        let err = VsixManifestReader.members(&path).unwrap_err();
        assert!(matches!(err, PackError::Zip(_)));
    }
}
