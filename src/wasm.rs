//! WebAssembly bindings for the extension wizard
//!
//! File sets cross the boundary as JSON arrays of `{name, content}`.

use crate::models::{FileSet, ImageAsset, ReferenceAsset};
use crate::packager::{PackRequest, Packager};
use crate::service::LibraryFetcher;
use async_trait::async_trait;
use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll, Waker};
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&JsValue::from_str(&format_args!($($t)*).to_string())))
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Render the popup preview.
///
/// Returns `{available, entry, frame}` where `frame` is the sandboxed
/// `<iframe>` to insert into the page.
#[wasm_bindgen]
pub fn render_preview(files_json: &str) -> Result<String, JsValue> {
    let files = parse_files(files_json)?;
    let preview = crate::preview::render_preview(&files);
    console_log!("Preview entry: {:?}", preview.entry);

    let result = serde_json::json!({
        "available": preview.available,
        "entry": preview.entry,
        "frame": crate::preview::sandboxed_frame(&preview),
    });
    to_json(&result)
}

/// Inflate an uploaded ZIP into a file list
#[wasm_bindgen]
pub fn unpack_archive(zip_data: &[u8]) -> Result<String, JsValue> {
    let files = crate::packager::unpack(zip_data).map_err(to_js)?;
    console_log!("Unpacked {} files", files.len());
    to_json(&files)
}

/// Lay `overlay_json` over `base_json`
#[wasm_bindgen]
pub fn merge_files(base_json: &str, overlay_json: &str) -> Result<String, JsValue> {
    let merged = crate::reconciler::merge(parse_files(base_json)?, parse_files(overlay_json)?);
    to_json(&merged)
}

/// Split files before a refine call into `{untouched, refinable}`
#[wasm_bindgen]
pub fn partition_for_refine(files_json: &str, size_limit: usize) -> Result<String, JsValue> {
    let files = parse_files(files_json)?;
    let partition = crate::reconciler::partition_for_refine(&files, size_limit);
    to_json(&serde_json::json!({
        "untouched": partition.untouched,
        "refinable": partition.refinable,
    }))
}

/// Build the installable ZIP.
///
/// Runs without network access: bundled libraries are replaced by an
/// explanatory comment, and only a supplied icon image or placeholders are
/// used for icons.
#[wasm_bindgen]
pub fn pack_archive(
    files_json: &str,
    icon: Option<Vec<u8>>,
    aux_json: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let files = parse_files(files_json)?;
    let aux_files: Vec<ReferenceAsset> = match aux_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid auxiliary files: {}", e)))?,
        None => Vec::new(),
    };
    let user_icon = icon.map(|bytes| ImageAsset::new("icon", bytes));

    let libraries = crate::config::WizardConfig::default().bundled_libraries;
    let packager = Packager::new(&libraries, &OfflineFetcher);
    let request = PackRequest {
        files: &files,
        user_icon: user_icon.as_ref(),
        icon_prompt: None,
        aux_files: &aux_files,
    };

    let archive = run_ready(packager.pack(request))?.map_err(to_js)?;
    console_log!("Packaged {} bytes ({:?} icons)", archive.bytes.len(), archive.icon_source);
    Ok(archive.bytes)
}

struct OfflineFetcher;

#[async_trait]
impl LibraryFetcher for OfflineFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        anyhow::bail!("{} cannot be downloaded from the browser build", url)
    }
}

/// Drive a future that never waits on I/O to completion
fn run_ready<F: Future>(future: F) -> Result<F::Output, JsValue> {
    let mut future = pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => Ok(output),
        Poll::Pending => Err(JsValue::from_str("packaging did not complete synchronously")),
    }
}

fn parse_files(json: &str) -> Result<FileSet, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid file list: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Failed to serialize: {}", e)))
}

fn to_js(e: crate::error::WizardError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
