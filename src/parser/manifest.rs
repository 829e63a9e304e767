//! Manifest parsing and icon patching

use crate::models::{FileEntry, FileSet, ManifestView, ICON_PATHS, MANIFEST_FILE};
use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// Parse manifest text into a JSON value.
///
/// Strict JSON is tried first; json5 is the fallback so hand-written
/// manifests with comments or trailing commas still load.
pub fn parse_manifest(content: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => Ok(value),
        Err(_) => json5::from_str::<Value>(content).context("Failed to parse manifest.json"),
    }
}

/// Project manifest text into a [`ManifestView`], or `None` when it does not
/// parse. The failure is logged, never raised.
pub fn read_manifest_view(content: &str) -> Option<ManifestView> {
    match parse_manifest(content) {
        Ok(value) if value.is_object() => Some(ManifestView::from_value(&value)),
        Ok(_) => {
            tracing::warn!("manifest.json is not a JSON object");
            None
        }
        Err(e) => {
            tracing::warn!("{:#}", e);
            None
        }
    }
}

/// The manifest at the root of the file set
pub fn root_manifest(files: &FileSet) -> Option<&FileEntry> {
    files.get(MANIFEST_FILE)
}

/// The first manifest anywhere in the file set
pub fn any_manifest(files: &FileSet) -> Option<&FileEntry> {
    files.find(|f| f.file_name() == MANIFEST_FILE)
}

/// Extension name for display, falling back when there is no usable manifest
pub fn extension_name(files: &FileSet, fallback: &str) -> String {
    root_manifest(files)
        .and_then(|m| read_manifest_view(&m.content))
        .and_then(|view| view.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Whether the manifest declares `icons`; `None` if it does not parse
pub fn declares_icons(content: &str) -> Option<bool> {
    read_manifest_view(content).map(|view| view.has_icons)
}

/// Point the manifest's `icons` at the packaged icon files.
///
/// Returns the patched text pretty-printed with two-space indentation, or
/// `None` when the manifest cannot be parsed. Other fields keep their order.
pub fn patch_icons(content: &str) -> Option<String> {
    let mut value = match parse_manifest(content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{:#}; icons not added to manifest", e);
            return None;
        }
    };

    let manifest = value.as_object_mut()?;
    let icons: Map<String, Value> = ICON_PATHS
        .iter()
        .map(|(size, path)| (size.to_string(), Value::String(path.to_string())))
        .collect();
    manifest.insert("icons".to_string(), Value::Object(icons));

    serde_json::to_string_pretty(&value).ok()
}
