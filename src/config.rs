//! Runtime configuration

use crate::reconciler::DEFAULT_REFINE_SIZE_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the persisted history inside the data directory
pub const HISTORY_FILE: &str = "history.json";

/// Third-party library the model references by a placeholder file and the
/// packager downloads for real
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundledLibrary {
    /// Substring identifying the placeholder path, e.g. `xlsx.full.min.js`
    pub marker: String,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WizardConfig {
    /// Where history is stored
    pub data_dir: PathBuf,
    /// Text files longer than this many characters are not sent for refinement
    pub refine_size_limit: usize,
    /// Files longer than this many characters are named only in chat context
    pub chat_context_limit: usize,
    /// Characters per file included in the summary request
    pub analysis_excerpt_limit: usize,
    /// Characters per reference file included in generation requests
    pub reference_excerpt_limit: usize,
    pub fetch_timeout_secs: u64,
    /// Download name of packaged archives, without `.zip`
    pub archive_name: String,
    pub bundled_libraries: Vec<BundledLibrary>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
            refine_size_limit: DEFAULT_REFINE_SIZE_LIMIT,
            chat_context_limit: 50_000,
            analysis_excerpt_limit: 5_000,
            reference_excerpt_limit: 50_000,
            fetch_timeout_secs: 30,
            archive_name: "chrome-extension".to_string(),
            bundled_libraries: vec![BundledLibrary {
                marker: "xlsx.full.min.js".to_string(),
                source_url: "https://cdnjs.cloudflare.com/ajax/libs/xlsx/0.18.5/xlsx.full.min.js"
                    .to_string(),
            }],
        }
    }
}

impl WizardConfig {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                tracing::debug!("loading config from {:?}", path);
                Self::load_from_file(&path)?
            }
            _ => Self::default(),
        };

        if let Ok(dir) = env::var("EXTWIZARD_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(limit) = env::var("EXTWIZARD_REFINE_LIMIT") {
            config.refine_size_limit = limit
                .parse()
                .context("Failed to parse EXTWIZARD_REFINE_LIMIT as usize")?;
        }

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = env::var("EXTWIZARD_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("extwizard").join("config.json"))
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("extwizard"))
            .unwrap_or_else(|| PathBuf::from(".extwizard"))
    }
}
