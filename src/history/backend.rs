//! Durable storage for the serialized history list

use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Stores the whole history as one serialized value
pub trait HistoryBackend {
    /// Stored value, or `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored value atomically
    fn write(&self, raw: &str) -> Result<()>;
}

/// History in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryBackend for JsonFileBackend {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 1. Write to temp file
        let temp_path = self.temp_path();
        fs::write(&temp_path, raw)?;

        // 2. Atomic rename (atomic on POSIX systems)
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-process backend; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn with_contents(raw: &str) -> Self {
        let backend = Self::default();
        backend.lock().contents = Some(raw.to_string());
        backend
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Make subsequent writes fail, to exercise error paths
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another holder panicked; the data is
        // still a plain value
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HistoryBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.lock().contents.clone())
    }

    fn write(&self, raw: &str) -> Result<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "write refused").into());
        }
        state.contents = Some(raw.to_string());
        state.writes += 1;
        Ok(())
    }
}
