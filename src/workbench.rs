//! Orchestration of generate, refine, upload, download, chat and history
//! flows around one working copy of an extension.
//!
//! Every operation takes `&mut self`, so only one runs at a time. A failed
//! operation leaves the working copy, summary and history as they were.

use crate::config::WizardConfig;
use crate::error::{Result, WizardError};
use crate::history::{HistoryBackend, HistoryStore, Selection};
use crate::models::{FileSet, HistoryRecord, ImageAsset, ReferenceAsset};
use crate::packager::{self, PackRequest, PackedArchive, Packager};
use crate::parser::manifest::extension_name;
use crate::preview::{render_preview, PreviewDocument};
use crate::reconciler::partition_for_refine;
use crate::service::context::{analysis_digest, chat_context, reference_context};
use crate::service::{
    parse_generated_files, ChatTurn, ExtensionModel, GenerationMode, GenerationRequest,
    IconGenerator, LibraryFetcher,
};
use std::sync::Arc;

/// Name given to history records whose manifest has no usable `name`
pub const UNTITLED_EXTENSION: &str = "Untitled Extension";

/// Summary used when the analysis call fails
pub const ANALYSIS_FALLBACK: &str = "The extension could not be analyzed.";

/// Reply used when the chat call fails
pub const CHAT_FALLBACK: &str =
    "The assistant could not read the file context or is unable to reply right now.";

/// A packaged archive with its download name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub archive: PackedArchive,
}

pub struct Workbench<B: HistoryBackend> {
    config: WizardConfig,
    model: Arc<dyn ExtensionModel>,
    icon_generator: Option<Arc<dyn IconGenerator>>,
    fetcher: Arc<dyn LibraryFetcher>,
    history: HistoryStore<B>,
    selection: Selection,
    files: Option<FileSet>,
    summary: Option<String>,
    last_instruction: Option<String>,
}

impl<B: HistoryBackend> Workbench<B> {
    pub fn new(
        config: WizardConfig,
        model: Arc<dyn ExtensionModel>,
        fetcher: Arc<dyn LibraryFetcher>,
        history: HistoryStore<B>,
    ) -> Self {
        Self {
            config,
            model,
            icon_generator: None,
            fetcher,
            history,
            selection: Selection::default(),
            files: None,
            summary: None,
            last_instruction: None,
        }
    }

    pub fn with_icon_generator(mut self, generator: Arc<dyn IconGenerator>) -> Self {
        self.icon_generator = Some(generator);
        self
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// The working copy, if anything has been generated or loaded
    pub fn files(&self) -> Option<&FileSet> {
        self.files.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn history(&self) -> &[HistoryRecord] {
        self.history.records()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Generate a new extension from scratch
    pub async fn generate(
        &mut self,
        instruction: &str,
        mode: GenerationMode,
        references: &[ReferenceAsset],
    ) -> Result<&FileSet> {
        let instruction = require_instruction(instruction)?;

        let references = self.render_references(references);
        let request = GenerationRequest {
            instruction,
            mode,
            existing_files: None,
            references: &references,
        };
        let files = self.call_generate(request).await?;

        self.last_instruction = Some(instruction.to_string());
        Ok(self.accept(files).await)
    }

    /// Revise the working copy.
    ///
    /// Binary and oversized files are withheld from the model and laid back
    /// under its answer afterwards.
    pub async fn refine(
        &mut self,
        instruction: &str,
        mode: GenerationMode,
        references: &[ReferenceAsset],
    ) -> Result<&FileSet> {
        let instruction = require_instruction(instruction)?;
        let current = self
            .files
            .as_ref()
            .ok_or_else(|| WizardError::InvalidInput("there is no extension to refine".to_string()))?;

        let partition = partition_for_refine(current, self.config.refine_size_limit);
        tracing::debug!(
            "refining {} files, {} withheld",
            partition.refinable.len(),
            partition.untouched.len()
        );

        let references = self.render_references(references);
        let request = GenerationRequest {
            instruction,
            mode,
            existing_files: Some(&partition.refinable),
            references: &references,
        };
        let response = self.call_generate(request).await?;
        let files = partition.reconcile(response);

        Ok(self.accept(files).await)
    }

    /// Replace the working copy with the contents of an uploaded archive
    pub async fn upload(&mut self, archive: &[u8]) -> Result<&FileSet> {
        let files = packager::unpack(archive)?;
        self.last_instruction = None;
        Ok(self.accept(files).await)
    }

    /// Replace the content of one file in the working copy
    pub fn update_file(&mut self, path: &str, content: impl Into<String>) -> Result<()> {
        let entry = self
            .files
            .as_mut()
            .and_then(|files| files.get_mut(path))
            .ok_or_else(|| WizardError::InvalidInput(format!("no file named '{}' is loaded", path)))?;
        entry.content = content.into();
        Ok(())
    }

    /// Package the working copy.
    ///
    /// Without a user icon, the summary (or else the last instruction)
    /// describes the icon to generate.
    pub async fn download(
        &self,
        user_icon: Option<&ImageAsset>,
        aux_files: &[ReferenceAsset],
    ) -> Result<Download> {
        let files = self
            .files
            .as_ref()
            .ok_or_else(|| WizardError::InvalidInput("there is no extension to download".to_string()))?;

        let icon_prompt = self
            .summary
            .as_deref()
            .or(self.last_instruction.as_deref())
            .filter(|p| !p.trim().is_empty());

        let request = PackRequest {
            files,
            user_icon,
            icon_prompt,
            aux_files,
        };
        self.package(request).await
    }

    /// Package a history record as it was saved
    pub async fn download_from_history(&self, id: &str) -> Result<Download> {
        let record = self.record(id)?;
        let icon_prompt = record.summary.as_deref().unwrap_or(&record.name);

        let mut request = PackRequest::new(&record.files);
        request.icon_prompt = Some(icon_prompt);
        self.package(request).await
    }

    /// Make a history record the working copy
    pub fn load_from_history(&mut self, id: &str) -> Result<&FileSet> {
        let record = self.record(id)?.clone();
        self.summary = record.summary;
        self.last_instruction = None;
        self.selection.clear();
        Ok(&*self.files.insert(record.files))
    }

    /// Ask the model about the working copy. Never fails.
    pub async fn chat(&self, conversation: &[ChatTurn]) -> String {
        let context = chat_context(self.files.as_ref(), self.config.chat_context_limit);
        match self.model.chat(conversation, context.as_deref()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("chat failed: {:#}", e);
                CHAT_FALLBACK.to_string()
            }
        }
    }

    /// Summarize a file set. Never fails.
    pub async fn summarize(&self, files: &FileSet) -> String {
        let digest = analysis_digest(files, self.config.analysis_excerpt_limit);
        match self.model.analyze(&digest).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("analysis failed: {:#}", e);
                ANALYSIS_FALLBACK.to_string()
            }
        }
    }

    pub fn preview(&self) -> Option<PreviewDocument> {
        self.files.as_ref().map(render_preview)
    }

    /// Delete one record; unknown ids are ignored
    pub fn delete_history(&mut self, id: &str) -> Result<()> {
        self.history.remove(id)?;
        self.selection.remove(id);
        Ok(())
    }

    pub fn toggle_selection(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    pub fn toggle_select_all(&mut self) {
        self.selection.toggle_all(self.history.records());
    }

    /// Delete every selected record; returns how many were removed
    pub fn delete_selected(&mut self) -> Result<usize> {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let removed = self.history.remove_many(self.selection.ids())?;
        self.selection.clear();
        Ok(removed)
    }

    fn render_references(&self, references: &[ReferenceAsset]) -> String {
        reference_context(references, self.config.reference_excerpt_limit)
    }

    async fn call_generate(&self, request: GenerationRequest<'_>) -> Result<FileSet> {
        tracing::info!(
            "requesting {} from the model",
            if request.is_refine() { "a revision" } else { "a new extension" }
        );
        let raw = self
            .model
            .generate(request)
            .await
            .map_err(|e| WizardError::Generation(format!("{:#}", e)))?;
        parse_generated_files(&raw)
    }

    /// Install a successful result: summarize it, record it in history and
    /// make it the working copy
    async fn accept(&mut self, files: FileSet) -> &FileSet {
        let summary = self.summarize(&files).await;
        let name = extension_name(&files, UNTITLED_EXTENSION);

        let record = HistoryRecord::new(name, files.clone(), Some(summary.clone()));
        if let Err(e) = self.history.append(record) {
            tracing::warn!("could not save history: {}", e);
        }

        self.summary = Some(summary);
        self.files.insert(files)
    }

    async fn package(&self, request: PackRequest<'_>) -> Result<Download> {
        let mut packager = Packager::new(&self.config.bundled_libraries, self.fetcher.as_ref());
        if let Some(generator) = &self.icon_generator {
            packager = packager.with_icon_generator(generator.as_ref());
        }

        let archive = packager.pack(request).await?;
        Ok(Download {
            file_name: packager::archive_file_name(&self.config.archive_name),
            archive,
        })
    }

    fn record(&self, id: &str) -> Result<&HistoryRecord> {
        self.history
            .get(id)
            .ok_or_else(|| WizardError::HistoryNotFound(id.to_string()))
    }
}

fn require_instruction(instruction: &str) -> Result<&str> {
    let trimmed = instruction.trim();
    if trimmed.is_empty() {
        return Err(WizardError::InvalidInput(
            "please describe what the extension should do".to_string(),
        ));
    }
    Ok(trimmed)
}
