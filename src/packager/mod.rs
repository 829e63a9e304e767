//! Package extraction and building

pub mod extractor;
pub mod builder;
pub mod icons;
pub mod library;

pub use builder::{IconSource, PackRequest, PackedArchive, Packager};
pub use extractor::{load_from_directory, read_reference, unpack};

use crate::error::Result;
use crate::models::FileSet;
use std::path::Path;

/// Load a file set from a directory or a `.zip` archive
pub fn load_file_set(path: &Path) -> Result<FileSet> {
    if path.is_dir() {
        extractor::load_from_directory(path)
    } else if path.extension().and_then(|e| e.to_str()) == Some("zip") {
        let bytes = std::fs::read(path)?;
        extractor::unpack(&bytes)
    } else {
        Err(crate::error::WizardError::InvalidInput(format!(
            "unsupported input {}: expected a directory or a .zip file",
            path.display()
        )))
    }
}

/// Download file name for an archive
pub fn archive_file_name(name: &str) -> String {
    format!("{}.zip", name)
}
