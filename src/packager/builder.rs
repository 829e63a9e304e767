//! Extension archive builder

use super::icons::{self, DerivedIcon, PLACEHOLDER_NOTE, PLACEHOLDER_NOTE_PATH};
use super::library::substitute_libraries;
use crate::config::BundledLibrary;
use crate::error::{Result, WizardError};
use crate::models::{FileEntry, FileSet, ImageAsset, ReferenceAsset, MANIFEST_FILE};
use crate::parser::manifest::{declares_icons, patch_icons, root_manifest};
use crate::service::{IconGenerator, LibraryFetcher};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// What to package
#[derive(Debug, Clone, Copy)]
pub struct PackRequest<'a> {
    pub files: &'a FileSet,
    /// Takes priority over `icon_prompt`
    pub user_icon: Option<&'a ImageAsset>,
    /// Description for the icon generator when no user icon is given
    pub icon_prompt: Option<&'a str>,
    /// Written first; generated files with the same path replace them
    pub aux_files: &'a [ReferenceAsset],
}

impl<'a> PackRequest<'a> {
    pub fn new(files: &'a FileSet) -> Self {
        Self {
            files,
            user_icon: None,
            icon_prompt: None,
            aux_files: &[],
        }
    }
}

/// Where packaged icons came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSource {
    UserImage,
    Generated,
    Placeholder,
    /// The manifest already declares icons, or there is no manifest
    Unchanged,
}

/// A finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArchive {
    pub bytes: Vec<u8>,
    pub icon_source: IconSource,
}

/// Turns file sets into installable zip archives
pub struct Packager<'a> {
    libraries: &'a [BundledLibrary],
    fetcher: &'a dyn LibraryFetcher,
    icon_generator: Option<&'a dyn IconGenerator>,
}

impl<'a> Packager<'a> {
    pub fn new(libraries: &'a [BundledLibrary], fetcher: &'a dyn LibraryFetcher) -> Self {
        Self {
            libraries,
            fetcher,
            icon_generator: None,
        }
    }

    pub fn with_icon_generator(mut self, generator: &'a dyn IconGenerator) -> Self {
        self.icon_generator = Some(generator);
        self
    }

    /// Build the archive. The input file set is not modified; any error
    /// aborts the whole run and no archive is produced.
    pub async fn pack(&self, request: PackRequest<'_>) -> Result<PackedArchive> {
        validate_entries(request.files)?;

        let mut archive = ArchiveStage::default();

        // 1. Auxiliary files first, so generated files can replace them
        for aux in request.aux_files {
            let bytes = if aux.is_binary {
                icons::decode_base64(&aux.content)
                    .map_err(|reason| WizardError::invalid_entry(&aux.name, reason))?
            } else {
                aux.content.clone().into_bytes()
            };
            archive.put(&aux.name, bytes);
        }

        // 2. Real library sources in place of placeholders
        let mut files = request.files.clone();
        substitute_libraries(&mut files, self.libraries, self.fetcher).await;

        // 3. Icons, patching a working copy of the manifest
        let mut manifest = root_manifest(&files).map(|m| m.content.clone());
        let icon_source = match self.resolve_icons(&request).await? {
            Some((source, derived)) => {
                stage_icons(&mut archive, &derived);
                if let Some(text) = manifest.as_mut() {
                    if let Some(patched) = patch_icons(text) {
                        *text = patched;
                    }
                }
                source
            }
            None => match manifest.as_deref().and_then(declares_icons) {
                Some(false) => {
                    stage_icons(&mut archive, &icons::placeholder_icons()?);
                    archive.put(PLACEHOLDER_NOTE_PATH, PLACEHOLDER_NOTE.as_bytes().to_vec());
                    if let Some(patched) = manifest.as_deref().and_then(patch_icons) {
                        manifest = Some(patched);
                    }
                    IconSource::Placeholder
                }
                _ => IconSource::Unchanged,
            },
        };

        // 4. Extension files
        for entry in &files {
            let bytes = match &manifest {
                Some(text) if entry.path == MANIFEST_FILE => text.clone().into_bytes(),
                _ => entry_bytes(entry)?,
            };
            archive.put(&entry.path, bytes);
        }

        Ok(PackedArchive {
            bytes: archive.finish()?,
            icon_source,
        })
    }

    async fn resolve_icons(
        &self,
        request: &PackRequest<'_>,
    ) -> Result<Option<(IconSource, Vec<DerivedIcon>)>> {
        if let Some(image) = request.user_icon {
            tracing::debug!("deriving icons from {}", image.name);
            let derived = icons::derive_icons(&image.bytes)?;
            return Ok(Some((IconSource::UserImage, derived)));
        }

        let (Some(prompt), Some(generator)) = (request.icon_prompt, self.icon_generator) else {
            return Ok(None);
        };

        tracing::debug!("no icon supplied, generating one");
        let generated = match generator.generate_icon(prompt).await {
            Ok(data) => icons::derive_icons_from_base64(&data),
            Err(e) => Err(WizardError::Generation(format!("{:#}", e))),
        };

        match generated {
            Ok(derived) => Ok(Some((IconSource::Generated, derived))),
            Err(e) => {
                tracing::warn!("icon generation failed, falling back to placeholders: {}", e);
                Ok(None)
            }
        }
    }
}

fn validate_entries(files: &FileSet) -> Result<()> {
    if files.is_empty() {
        return Err(WizardError::InvalidInput(
            "no files were provided to package".to_string(),
        ));
    }
    for entry in files {
        if entry.path.is_empty() || entry.path.ends_with('/') {
            return Err(WizardError::invalid_entry(&entry.path, "not a file path"));
        }
    }
    Ok(())
}

fn entry_bytes(entry: &FileEntry) -> Result<Vec<u8>> {
    if entry.kind().is_base64() {
        icons::decode_base64(&entry.content)
            .map_err(|reason| WizardError::invalid_entry(&entry.path, reason))
    } else {
        Ok(entry.content.clone().into_bytes())
    }
}

fn stage_icons(archive: &mut ArchiveStage, derived: &[DerivedIcon]) {
    for icon in derived {
        // Freshly encoded by the icon pipeline, so this cannot fail
        if let Ok(bytes) = icons::decode_base64(&icon.png_base64) {
            archive.put(icon.path, bytes);
        }
    }
}

/// Archive contents collected before anything is written; a later `put` to
/// the same path replaces the earlier one in place.
#[derive(Default)]
struct ArchiveStage {
    entries: Vec<(String, Vec<u8>)>,
    index: HashMap<String, usize>,
}

impl ArchiveStage {
    fn put(&mut self, path: &str, bytes: Vec<u8>) {
        match self.index.get(path) {
            Some(&i) => self.entries[i].1 = bytes,
            None => {
                self.index.insert(path.to_string(), self.entries.len());
                self.entries.push((path.to_string(), bytes));
            }
        }
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        // No time feature: entries get the fixed default timestamp, so equal
        // inputs produce equal archives
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755);

        let mut folders = HashSet::new();
        for (path, bytes) in &self.entries {
            let segments: Vec<&str> = path.split('/').collect();
            for depth in 1..segments.len() {
                let folder = format!("{}/", segments[..depth].join("/"));
                if folders.insert(folder.clone()) {
                    zip.add_directory(folder, options)?;
                }
            }

            zip.start_file(path.as_str(), options)?;
            zip.write_all(bytes)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}
