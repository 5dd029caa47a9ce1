//! Marketplace gallery access
//!
//! Wire types and a blocking HTTP client for the extension query API.

pub mod api;
pub mod client;

pub use api::{ExtensionRecord, Property, Publisher, QueryResponse, VersionRecord};
pub use client::{GalleryClient, GalleryError};
