//! Replacement of bundled-library placeholders with the real library

use crate::config::BundledLibrary;
use crate::models::FileSet;
use crate::service::LibraryFetcher;

/// Fill every file whose path contains a library marker with the library
/// source. A failed download leaves an explanatory comment in the file
/// instead of failing the packaging run.
pub async fn substitute_libraries(
    files: &mut FileSet,
    libraries: &[BundledLibrary],
    fetcher: &dyn LibraryFetcher,
) {
    for library in libraries {
        let targets: Vec<String> = files
            .paths()
            .filter(|p| p.contains(&library.marker))
            .map(str::to_string)
            .collect();
        if targets.is_empty() {
            continue;
        }

        let content = match fetcher.fetch(&library.source_url).await {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("could not download {}: {:#}", library.marker, e);
                failure_notice(library, &format!("{:#}", e))
            }
        };

        for path in &targets {
            if let Some(entry) = files.get_mut(path) {
                entry.content = content.clone();
            }
        }
    }
}

fn failure_notice(library: &BundledLibrary, detail: &str) -> String {
    format!(
        "/*\n  ERROR: {} could not be downloaded automatically.\n  \
         Download it manually from {} and paste it into this file.\n  \
         Details: {}\n*/",
        library.marker,
        library.source_url,
        detail.replace("*/", "* /")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(Option<&'static str>, AtomicUsize);

    #[async_trait]
    impl LibraryFetcher for Fixed {
        async fn fetch(&self, _url: &str) -> anyhow::Result<String> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("network unreachable"))
        }
    }

    fn library() -> Vec<BundledLibrary> {
        vec![BundledLibrary {
            marker: "xlsx.full.min.js".to_string(),
            source_url: "https://cdn.example/xlsx.full.min.js".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_substitutes_fetched_source() {
        let mut files = FileSet::from_entries(vec![
            FileEntry::new("libs/xlsx.full.min.js", "// placeholder"),
            FileEntry::new("popup.js", "XLSX.read()"),
        ]);
        let fetcher = Fixed(Some("/* sheetjs */"), AtomicUsize::new(0));

        substitute_libraries(&mut files, &library(), &fetcher).await;

        assert_eq!(files.get("libs/xlsx.full.min.js").unwrap().content, "/* sheetjs */");
        assert_eq!(files.get("popup.js").unwrap().content, "XLSX.read()");
        assert_eq!(fetcher.1.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_notice() {
        let mut files = FileSet::from_entries(vec![FileEntry::new("xlsx.full.min.js", "")]);
        let fetcher = Fixed(None, AtomicUsize::new(0));

        substitute_libraries(&mut files, &library(), &fetcher).await;

        let content = &files.get("xlsx.full.min.js").unwrap().content;
        assert!(content.starts_with("/*"));
        assert!(content.contains("https://cdn.example/xlsx.full.min.js"));
        assert!(content.contains("network unreachable"));
    }

    #[tokio::test]
    async fn test_no_marker_no_fetch() {
        let mut files = FileSet::from_entries(vec![FileEntry::new("popup.js", "")]);
        let fetcher = Fixed(None, AtomicUsize::new(0));

        substitute_libraries(&mut files, &library(), &fetcher).await;

        assert_eq!(fetcher.1.load(Ordering::SeqCst), 0);
    }
}
