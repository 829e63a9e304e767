//! Contracts with the external content generation services
//!
//! The model client itself lives outside this crate. Implementations are
//! injected into [`crate::workbench::Workbench`] and
//! [`crate::packager::Packager`].

pub mod context;
pub mod response;

#[cfg(feature = "cli")]
pub mod http;

use crate::models::FileSet;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use response::parse_generated_files;

/// Speed/quality trade-off requested from the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Fast,
    #[default]
    Deep,
}

/// Input of one generate or refine call
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub instruction: &'a str,
    pub mode: GenerationMode,
    /// Files to revise; `None` for a fresh generation
    pub existing_files: Option<&'a FileSet>,
    /// Auxiliary files rendered by [`context::reference_context`]; empty when
    /// none were supplied
    pub references: &'a str,
}

impl GenerationRequest<'_> {
    pub fn is_refine(&self) -> bool {
        self.existing_files.map_or(false, |files| !files.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Language model that writes, summarizes and discusses extensions
#[async_trait]
pub trait ExtensionModel: Send + Sync {
    /// Produce a file list. The raw response text is returned and validated
    /// by [`parse_generated_files`].
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String>;

    /// Short summary of what the extension does
    async fn analyze(&self, digest: &str) -> Result<String>;

    /// Reply to a conversation; `file_context` describes the current files
    async fn chat(&self, history: &[ChatTurn], file_context: Option<&str>) -> Result<String>;
}

/// Image model producing icon artwork
#[async_trait]
pub trait IconGenerator: Send + Sync {
    /// Base64 image data (a data URI header is tolerated)
    async fn generate_icon(&self, description: &str) -> Result<String>;
}

/// Source of bundled third-party libraries
#[async_trait]
pub trait LibraryFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
