//! Extension source files keyed by path

use crate::utils::file_kind::FileKind;
use serde::{Deserialize, Deserializer, Serialize};

/// A single file of an extension source tree.
///
/// `content` is UTF-8 text, or base64 when [`FileKind::of`] says the path
/// holds encoded data. Serialized as `{ "name", "content" }`, the same shape
/// the generation service answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "name")]
    pub path: String,
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::of(&self.path)
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory part including the trailing slash, or "" at the root
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..=idx],
            None => "",
        }
    }

    /// Content length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Ordered collection of files with unique paths.
///
/// Order follows insertion; inserting an existing path replaces the entry in
/// place so the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileSet {
    entries: Vec<FileEntry>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FileEntry>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            set.insert(entry);
        }
        set
    }

    /// Insert or replace by path. Returns the replaced entry, if any.
    pub fn insert(&mut self, entry: FileEntry) -> Option<FileEntry> {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FileEntry> {
        self.entries.iter_mut().find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// First entry matching the predicate, in set order
    pub fn find(&self, predicate: impl Fn(&FileEntry) -> bool) -> Option<&FileEntry> {
        self.entries.iter().find(|e| predicate(e))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for FileSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<FileEntry>::deserialize(deserializer).map(Self::from_entries)
    }
}

impl FromIterator<FileEntry> for FileSet {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl IntoIterator for FileSet {
    type Item = FileEntry;
    type IntoIter = std::vec::IntoIter<FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
