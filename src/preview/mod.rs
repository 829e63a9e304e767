//! Self-contained popup preview
//!
//! Generated and uploaded pages are arbitrary code. Display them only through
//! [`sandboxed_frame`], which allows scripts and forms but no navigation of
//! the host page.

pub mod entry;
pub mod inliner;

pub use entry::{locate_entry, EntryPoint};
pub use inliner::Inliner;

use crate::models::FileSet;
use crate::utils::PathResolver;

/// iframe `sandbox` tokens for preview frames
pub const PREVIEW_SANDBOX: &str = "allow-scripts allow-forms";

const NO_PREVIEW_DOCUMENT: &str = "<div style=\"color: white; padding: 20px; text-align: center; font-family: sans-serif;\">\
No popup page to preview was found for this extension (none declared in manifest.json and no popup.html).\
</div>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub available: bool,
    pub document: String,
    /// Path of the page that was rendered
    pub entry: Option<String>,
}

/// Render the extension's popup as a single HTML document
pub fn render_preview(files: &FileSet) -> PreviewDocument {
    let Some(entry) = locate_entry(files) else {
        return PreviewDocument {
            available: false,
            document: NO_PREVIEW_DOCUMENT.to_string(),
            entry: None,
        };
    };

    tracing::debug!("previewing {} (root '{}')", entry.file.path, entry.root);
    let inliner = Inliner::new(files, PathResolver::new(entry.root.as_str()), entry.file.directory());

    PreviewDocument {
        available: true,
        document: inliner.inline(&entry.file.content),
        entry: Some(entry.file.path.clone()),
    }
}

/// The document wrapped in a sandboxed `<iframe srcdoc>`
pub fn sandboxed_frame(preview: &PreviewDocument) -> String {
    format!(
        "<iframe sandbox=\"{}\" srcdoc=\"{}\" title=\"Extension preview\" width=\"400\" height=\"600\"></iframe>",
        PREVIEW_SANDBOX,
        escape_attribute(&preview.document)
    )
}

/// Standalone host page embedding the sandboxed frame
pub fn host_page(preview: &PreviewDocument) -> String {
    let title = preview.entry.as_deref().unwrap_or("no preview");
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Preview: {}</title>\n</head>\n\
         <body style=\"background:#111827;\">\n{}\n</body>\n</html>\n",
        escape_attribute(title),
        sandboxed_frame(preview)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileEntry;

    #[test]
    fn test_no_entry_point_is_unavailable() {
        let files = FileSet::from_entries(vec![
            FileEntry::new("background.js", "chrome.runtime.onInstalled.addListener(() => {})"),
        ]);
        let preview = render_preview(&files);
        assert!(!preview.available);
        assert!(!preview.document.is_empty());
        assert_eq!(preview.entry, None);
    }

    #[test]
    fn test_absolute_reference_uses_root() {
        let files = FileSet::from_entries(vec![
            FileEntry::new("ext/manifest.json", r#"{"action":{"default_popup":"ui/popup.html"}}"#),
            FileEntry::new("ext/ui/popup.html", r#"<link rel="stylesheet" href="/theme.css">"#),
            FileEntry::new("ext/theme.css", "p{}"),
        ]);
        let preview = render_preview(&files);
        assert_eq!(preview.entry.as_deref(), Some("ext/ui/popup.html"));
        assert_eq!(preview.document, "<style>/* ext/theme.css */\np{}</style>");
    }

    #[test]
    fn test_sandboxed_frame_escapes_document() {
        let preview = PreviewDocument {
            available: true,
            document: r#"<p class="x">a & b</p>"#.to_string(),
            entry: Some("popup.html".to_string()),
        };
        let frame = sandboxed_frame(&preview);
        assert!(frame.starts_with(r#"<iframe sandbox="allow-scripts allow-forms" srcdoc=""#));
        assert!(frame.contains("&lt;p class=&quot;x&quot;&gt;a &amp; b&lt;/p&gt;"));
        assert!(!frame.contains("allow-top-navigation"));
        assert!(!frame.contains("allow-same-origin"));
    }
}
