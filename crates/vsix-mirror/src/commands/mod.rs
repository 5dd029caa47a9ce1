//! Command orchestration
//!
//! Implements the mirror run driven by the CLI.

pub mod mirror;

pub use mirror::{mirror_extensions, MirrorError, MirrorOptions, MirrorReport};
