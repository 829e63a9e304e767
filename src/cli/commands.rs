//! `pack`, `unpack` and `preview`

use super::{print_header, print_warning, spinner};
use crate::config::WizardConfig;
use crate::models::{FileSet, ImageAsset};
use crate::packager::{self, icons, load_file_set, read_reference, IconSource, PackRequest, Packager};
use crate::preview::{host_page, render_preview};
use crate::service::http::HttpLibraryFetcher;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Package a directory or archive into an installable zip
pub async fn pack(
    config: &WizardConfig,
    input: &Path,
    output: Option<&Path>,
    icon: Option<&Path>,
    aux: &[PathBuf],
) -> Result<()> {
    print_header("Packaging extension");

    let files = load_input(input)?;

    let user_icon = match icon {
        Some(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read icon: {}", path.display()))?;
            Some(ImageAsset::new(path.display().to_string(), bytes))
        }
        None => None,
    };

    let aux_files = aux
        .iter()
        .map(|path| {
            read_reference(path)
                .with_context(|| format!("Failed to read auxiliary file: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(packager::archive_file_name(&config.archive_name)),
    };

    let request = PackRequest {
        files: &files,
        user_icon: user_icon.as_ref(),
        icon_prompt: None,
        aux_files: &aux_files,
    };
    let archive = pack_with_spinner(config, request).await?;
    write_output(&output, &archive.bytes)?;

    println!("{}", "✅ Extension packaged successfully!".green().bold());
    println!();
    println!("📊 Summary:");
    println!("  - Files: {}", files.len());
    if !aux_files.is_empty() {
        println!("  - Auxiliary files: {}", aux_files.len());
    }
    println!("  - Icons: {}", describe_icons(archive.icon_source));
    println!("  - Size: {} bytes", archive.bytes.len());
    println!("  - Output: {}", output.display());

    Ok(())
}

/// Extract an archive into a directory
pub fn unpack(input: &Path, output: &Path) -> Result<()> {
    print_header("Unpacking extension");

    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let files = packager::unpack(&bytes)
        .with_context(|| format!("Failed to unpack {}", input.display()))?;

    let mut written = 0;
    for entry in &files {
        if !is_contained(&entry.path) {
            print_warning(&format!("Skipping {}: path leaves the output directory", entry.path));
            continue;
        }

        let content = if entry.kind().is_base64() {
            icons::decode_base64(&entry.content)
                .map_err(|reason| anyhow::anyhow!("{}: {}", entry.path, reason))?
        } else {
            entry.content.clone().into_bytes()
        };
        write_output(&output.join(&entry.path), &content)?;
        written += 1;
    }

    println!("{}", "✅ Extension unpacked successfully!".green().bold());
    println!("  - Files written: {}", written);
    println!("  - Output: {}", output.display());
    Ok(())
}

/// Render the popup into a standalone HTML page
pub fn preview(input: &Path, output: &Path) -> Result<()> {
    let files = load_input(input)?;
    let preview = render_preview(&files);

    write_output(output, host_page(&preview).as_bytes())?;

    match &preview.entry {
        Some(entry) => println!("{} {}", "✅ Previewing".green().bold(), entry),
        None => print_warning("No popup page was found; the preview shows a notice instead"),
    }
    println!("  - Output: {}", output.display());
    Ok(())
}

pub(crate) async fn pack_with_spinner(
    config: &WizardConfig,
    request: PackRequest<'_>,
) -> Result<packager::PackedArchive> {
    let fetcher = HttpLibraryFetcher::new(config.fetch_timeout())?;
    let packager = Packager::new(&config.bundled_libraries, &fetcher);

    let bar = spinner("Building archive...");
    let result = packager.pack(request).await;
    bar.finish_and_clear();

    result.context("Packaging failed")
}

pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn load_input(input: &Path) -> Result<FileSet> {
    load_file_set(input).with_context(|| format!("Failed to load {}", input.display()))
}

fn describe_icons(source: IconSource) -> &'static str {
    match source {
        IconSource::UserImage => "derived from the supplied image",
        IconSource::Generated => "generated",
        IconSource::Placeholder => "placeholders added",
        IconSource::Unchanged => "unchanged",
    }
}

/// Whether an archive path stays below the directory it is extracted into
fn is_contained(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_contained() {
        assert!(is_contained("icons/icon16.png"));
        assert!(is_contained("./popup.html"));
        assert!(!is_contained("../escape.js"));
        assert!(!is_contained("/etc/passwd"));
        assert!(!is_contained("a/../../b"));
    }

    #[test]
    fn test_preview_writes_host_page() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("ext");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("popup.html"), "<body><p>hi</p></body>").unwrap();

        let output = temp_dir.path().join("out/preview.html");
        preview(&input, &output).unwrap();

        let page = fs::read_to_string(&output).unwrap();
        assert!(page.contains("sandbox=\"allow-scripts allow-forms\""));
        assert!(page.contains("&lt;p&gt;hi&lt;/p&gt;"));
    }
}
