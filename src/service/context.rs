//! Text renderings of file sets handed to the model

use crate::models::{FileSet, ReferenceAsset};
use crate::utils::helpers::truncate_chars;

/// Per-file excerpt for the summary request. Opaque files are named only.
pub fn analysis_digest(files: &FileSet, excerpt_limit: usize) -> String {
    files
        .iter()
        .map(|f| {
            let body = if f.kind().is_opaque() {
                "[image or binary data]"
            } else {
                truncate_chars(&f.content, excerpt_limit)
            };
            format!("File: {}\nContent: {}", f.path, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Current files as chat context.
///
/// Opaque files and files longer than `size_limit` characters appear by name
/// only. Returns `None` when there is nothing to describe.
pub fn chat_context(files: Option<&FileSet>, size_limit: usize) -> Option<String> {
    let files = files.filter(|f| !f.is_empty())?;

    let mut context = String::from("CURRENT EXTENSION FILES:\n");
    for f in files {
        if f.kind().is_opaque() || f.char_len() > size_limit {
            context.push_str(&format!(
                "File: {} (omitted: binary or too large)\n\n",
                f.path
            ));
        } else {
            context.push_str(&format!("File: {}\nContent:\n{}\n\n", f.path, f.content));
        }
    }
    Some(context)
}

/// Auxiliary files rendered for a generation request
pub fn reference_context(references: &[ReferenceAsset], excerpt_limit: usize) -> String {
    references
        .iter()
        .map(|r| {
            let body = if r.is_binary {
                "[binary data]"
            } else {
                truncate_chars(&r.content, excerpt_limit)
            };
            format!("--- REFERENCE FILE: {} ---\n{}\n\n", r.name, body)
        })
        .collect()
}
