//! File set extraction from archives and directories

use crate::error::{Result, WizardError};
use crate::models::{FileEntry, FileSet, ReferenceAsset};
use crate::utils::FileKind;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Inflate a zip archive into a file set.
///
/// Directory entries are skipped. Base64-stored kinds are encoded, everything
/// else is decoded as UTF-8 (invalid sequences are replaced).
pub fn unpack(archive_bytes: &[u8]) -> Result<FileSet> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes)).map_err(|e| {
        tracing::warn!("unreadable archive: {}", e);
        WizardError::EmptyArchive
    })?;

    let mut files = FileSet::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let path = file.name().to_string();
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;

        files.insert(encode_content(path, &content));
    }

    if files.is_empty() {
        return Err(WizardError::EmptyArchive);
    }

    tracing::debug!("unpacked {} files", files.len());
    Ok(files)
}

/// Load every file below `dir`, with paths relative to it
pub fn load_from_directory(dir: &Path) -> Result<FileSet> {
    let mut files = FileSet::new();

    for entry in WalkDir::new(dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative_path = path.strip_prefix(dir).map_err(|_| {
            WizardError::invalid_entry(path.display().to_string(), "outside the source directory")
        })?;
        let relative = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let content = fs::read(path)?;
        files.insert(encode_content(relative, &content));
    }

    if files.is_empty() {
        return Err(WizardError::InvalidInput(format!(
            "no files found in {}",
            dir.display()
        )));
    }

    Ok(files)
}

/// Read a user-supplied auxiliary file. Files that are not valid UTF-8 or
/// have a binary extension are kept as base64.
pub fn read_reference(path: &Path) -> Result<ReferenceAsset> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| WizardError::InvalidInput(format!("{} is not a file", path.display())))?;
    let bytes = fs::read(path)?;

    if FileKind::of(&name).is_opaque() {
        return Ok(ReferenceAsset::binary(name, BASE64.encode(&bytes)));
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(ReferenceAsset::text(name, text)),
        Err(e) => Ok(ReferenceAsset::binary(name, BASE64.encode(e.as_bytes()))),
    }
}

fn encode_content(path: String, bytes: &[u8]) -> FileEntry {
    let content = if FileKind::of(&path).is_base64() {
        BASE64.encode(bytes)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };
    FileEntry { path, content }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::{FileOptions, ZipWriter};

    fn zip_of(entries: &[(&str, &[u8])], dirs: &[&str]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        for dir in dirs {
            zip.add_directory(*dir, options).unwrap();
        }
        for (name, bytes) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_unpack_classifies_entries() {
        let bytes = zip_of(
            &[
                ("manifest.json", br#"{"name":"T"}"#.as_slice()),
                ("icons/icon16.png", [0x89, b'P', b'N', b'G'].as_slice()),
            ],
            &["icons/"],
        );

        let files = unpack(&bytes).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files.get("manifest.json").unwrap().content, r#"{"name":"T"}"#);
        assert_eq!(
            files.get("icons/icon16.png").unwrap().content,
            BASE64.encode([0x89, b'P', b'N', b'G'])
        );
        assert!(!files.contains("icons/"));
    }

    #[test]
    fn test_unpack_only_directories_is_empty() {
        let bytes = zip_of(&[], &["icons/", "css/"]);
        assert!(matches!(unpack(&bytes), Err(WizardError::EmptyArchive)));
    }

    #[test]
    fn test_unpack_garbage_is_empty_archive() {
        assert!(matches!(unpack(b"definitely not a zip"), Err(WizardError::EmptyArchive)));
    }

    #[test]
    fn test_load_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("icons")).unwrap();
        fs::write(temp_dir.path().join("manifest.json"), r#"{"name":"Test"}"#).unwrap();
        fs::write(temp_dir.path().join("icons/icon16.png"), [1u8, 2, 3]).unwrap();

        let files = load_from_directory(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files.get("icons/icon16.png").unwrap().content, BASE64.encode([1u8, 2, 3]));
        assert_eq!(files.get("manifest.json").unwrap().content, r#"{"name":"Test"}"#);
    }

    #[test]
    fn test_read_reference() {
        let temp_dir = TempDir::new().unwrap();
        let notes = temp_dir.path().join("notes.txt");
        let sheet = temp_dir.path().join("data.xlsx");
        let blob = temp_dir.path().join("blob.dat");
        fs::write(&notes, "hello").unwrap();
        fs::write(&sheet, [0x50u8, 0x4b]).unwrap();
        fs::write(&blob, [0xffu8, 0xfe, 0x00]).unwrap();

        assert_eq!(read_reference(&notes).unwrap(), ReferenceAsset::text("notes.txt", "hello"));
        assert_eq!(
            read_reference(&sheet).unwrap(),
            ReferenceAsset::binary("data.xlsx", BASE64.encode([0x50u8, 0x4b]))
        );
        assert!(read_reference(&blob).unwrap().is_binary);
    }
}
