//! Fake services and archive helpers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use extwizard::models::{FileEntry, FileSet};
use extwizard::service::{ChatTurn, ExtensionModel, GenerationRequest, IconGenerator, LibraryFetcher};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::collections::{BTreeMap, VecDeque};
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use zip::ZipArchive;

/// What the model was asked in one `generate` call
#[derive(Debug, Clone, PartialEq)]
pub struct SeenRequest {
    pub instruction: String,
    pub existing: Option<Vec<String>>,
    pub references: String,
}

/// Model answering from a queue of canned responses
#[derive(Default)]
pub struct FakeModel {
    responses: Mutex<VecDeque<Result<String, String>>>,
    pub seen: Mutex<Vec<SeenRequest>>,
    /// `None` makes `analyze` fail
    pub summary: Option<String>,
    pub reply: Option<String>,
    pub chat_contexts: Mutex<Vec<Option<String>>>,
}

impl FakeModel {
    pub fn with_summary(summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            reply: Some("sure".to_string()),
            ..Self::default()
        }
    }

    pub fn push_files(&self, files: &[(&str, &str)]) {
        let set: FileSet = files.iter().map(|(p, c)| FileEntry::new(*p, *c)).collect();
        let json = serde_json::to_string(&set).unwrap();
        self.responses.lock().unwrap().push_back(Ok(json));
    }

    pub fn push_raw(&self, raw: &str) {
        self.responses.lock().unwrap().push_back(Ok(raw.to_string()));
    }

    pub fn push_error(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtensionModel for FakeModel {
    async fn generate(&self, request: GenerationRequest<'_>) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(SeenRequest {
            instruction: request.instruction.to_string(),
            existing: request
                .existing_files
                .map(|files| files.paths().map(str::to_string).collect()),
            references: request.references.to_string(),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no response queued")),
        }
    }

    async fn analyze(&self, _digest: &str) -> anyhow::Result<String> {
        self.summary
            .clone()
            .ok_or_else(|| anyhow::anyhow!("analysis unavailable"))
    }

    async fn chat(&self, _history: &[ChatTurn], file_context: Option<&str>) -> anyhow::Result<String> {
        self.chat_contexts
            .lock()
            .unwrap()
            .push(file_context.map(str::to_string));
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("chat unavailable"))
    }
}

/// Icon generator that counts calls and answers with a fixed result
pub struct FakeIconGenerator {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    response: Result<String, String>,
}

impl FakeIconGenerator {
    pub fn returning_png() -> Self {
        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png(64, 64));
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            response: Ok(format!("data:image/png;base64,{}", encoded)),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            response: Err("quota exceeded".to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IconGenerator for FakeIconGenerator {
    async fn generate_icon(&self, description: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(description.to_string());
        self.response.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Library fetcher with a fixed answer
pub struct FakeFetcher(pub Option<&'static str>);

#[async_trait]
impl LibraryFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        match self.0 {
            Some(source) => Ok(source.to_string()),
            None => anyhow::bail!("{} unreachable", url),
        }
    }
}

pub fn set(entries: &[(&str, &str)]) -> FileSet {
    entries.iter().map(|(p, c)| FileEntry::new(*p, *c)).collect()
}

/// A solid red PNG
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

pub fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap();
    (image.width(), image.height())
}

/// Every archive entry, directories included (with empty content)
pub fn read_archive(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        entries.insert(file.name().to_string(), content);
    }
    entries
}

/// Entry names in archive order
pub fn archive_order(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn text(entries: &BTreeMap<String, Vec<u8>>, path: &str) -> String {
    String::from_utf8(entries[path].clone()).unwrap()
}
