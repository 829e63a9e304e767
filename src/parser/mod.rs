//! Parsing modules for extension manifests

pub mod manifest;

pub use manifest::{parse_manifest, patch_icons, read_manifest_view};
