//! Merging model output back into an existing file set

use crate::models::{FileEntry, FileSet};

/// Default size above which a text file is not sent for refinement
pub const DEFAULT_REFINE_SIZE_LIMIT: usize = 80_000;

/// Keyed union of two file sets.
///
/// Entries of `overlay` replace same-path entries of `base` in place; paths
/// new to `base` follow in overlay order.
pub fn merge(base: FileSet, overlay: FileSet) -> FileSet {
    let mut merged = base;
    for entry in overlay {
        merged.insert(entry);
    }
    merged
}

/// A file set split before a refine call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefinePartition {
    /// Binary or oversized files kept out of the model request
    pub untouched: FileSet,
    /// Files sent to the model together with the instruction
    pub refinable: FileSet,
}

impl RefinePartition {
    /// Lay the model's answer over the untouched files
    pub fn reconcile(self, response: FileSet) -> FileSet {
        merge(self.untouched, response)
    }
}

/// Whether a file must stay out of a refine request
pub fn is_untouched(entry: &FileEntry, size_limit: usize) -> bool {
    entry.kind().is_opaque() || entry.char_len() > size_limit
}

/// Split files into those the model may rewrite and those it never sees
pub fn partition_for_refine(files: &FileSet, size_limit: usize) -> RefinePartition {
    let mut partition = RefinePartition::default();
    for entry in files {
        if is_untouched(entry, size_limit) {
            partition.untouched.insert(entry.clone());
        } else {
            partition.refinable.insert(entry.clone());
        }
    }
    partition
}
