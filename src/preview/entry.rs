//! Popup page discovery

use crate::models::{FileEntry, FileSet};
use crate::parser::manifest::{any_manifest, read_manifest_view};
use crate::utils::PathResolver;

/// The page to preview and the directory the extension lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint<'a> {
    pub file: &'a FileEntry,
    /// `""` or a `/`-terminated directory prefix
    pub root: String,
}

/// Find the popup page.
///
/// The manifest's directory is the extension root. Its declared popup wins;
/// otherwise `<root>popup.html`, any `*/popup.html`, `popup.html` and
/// `<root>index.html` are tried in that order.
pub fn locate_entry(files: &FileSet) -> Option<EntryPoint<'_>> {
    let manifest = any_manifest(files);
    let mut root = manifest
        .map(|m| m.directory().to_string())
        .unwrap_or_default();

    if let Some(file) = manifest.and_then(|m| declared_popup(files, m, &root)) {
        return Some(EntryPoint { file, root });
    }

    let file = files
        .get(&format!("{}popup.html", root))
        .or_else(|| files.find(|f| f.path.ends_with("/popup.html")))
        .or_else(|| files.get("popup.html"))
        .or_else(|| files.get(&format!("{}index.html", root)))?;

    if root.is_empty() {
        root = file.directory().to_string();
    }

    Some(EntryPoint { file, root })
}

fn declared_popup<'a>(files: &'a FileSet, manifest: &FileEntry, root: &str) -> Option<&'a FileEntry> {
    let view = read_manifest_view(&manifest.content)?;
    let popup = view.default_popup()?;
    let popup = popup
        .strip_prefix("./")
        .or_else(|| popup.strip_prefix('/'))
        .unwrap_or(popup);

    let path = PathResolver::new(root).resolve(root, popup)?;
    let found = files.get(&path);
    if found.is_none() {
        tracing::debug!("declared popup {} is not in the file set", path);
    }
    found
}
