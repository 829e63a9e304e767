//! Extension-based file classification
//!
//! File entries carry no binary flag; the path extension alone decides how
//! their content is stored. Every component asks this module.

/// How a path's content is stored and treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Raster image, stored as base64
    Image,
    /// Other opaque payload (archives, spreadsheets), stored as base64
    Binary,
    /// SVG: kept as text but never sent to the model
    Vector,
    Text,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "ico", "webp", "bmp"];
const BINARY_EXTENSIONS: &[&str] = &["xlsx", "xls", "zip"];
const VECTOR_EXTENSIONS: &[&str] = &["svg"];

impl FileKind {
    pub fn of(path: &str) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let ext = match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return FileKind::Text,
        };

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Image
        } else if BINARY_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Binary
        } else if VECTOR_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Vector
        } else {
            FileKind::Text
        }
    }

    /// Content is base64 and must be decoded before writing to an archive
    pub fn is_base64(self) -> bool {
        matches!(self, FileKind::Image | FileKind::Binary)
    }

    /// Content is not useful to a language model
    pub fn is_opaque(self) -> bool {
        !matches!(self, FileKind::Text)
    }
}
