//! Extension list configuration
//!
//! Reads extension identifiers from the `[vscode...]` sections of a plain
//! sectioned config file shared with other mirroring tools.

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Section prefix whose entries are treated as extension identifiers
const SECTION_PREFIX: &str = "[vscode";

/// Read extension identifiers from a config file.
///
/// Blank lines and `#` comments are ignored. `[...]` lines switch sections;
/// only lines inside sections whose name starts with `vscode` contribute
/// identifiers.
pub fn read_extension_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    let contents = fs::read_to_string(path)?;

    let mut names = Vec::new();
    let mut in_section = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_section = line.starts_with(SECTION_PREFIX);
        } else if in_section {
            names.push(line.to_string());
        }
    }

    Ok(names)
}
