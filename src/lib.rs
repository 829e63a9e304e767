//! Browser Extension Wizard
//!
//! A library for turning natural-language descriptions into browser
//! extensions. Handles reconciliation of generated files, popup preview
//! rendering, icon derivation and archive packaging. The generative model is
//! an injected service (see [`service`]).

pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod packager;
pub mod parser;
pub mod preview;
pub mod reconciler;
pub mod service;
pub mod utils;
pub mod workbench;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::WizardConfig;
pub use error::{Result, WizardError};
pub use models::{FileEntry, FileSet, HistoryRecord, ImageAsset, ManifestView, ReferenceAsset};
pub use packager::{unpack, PackRequest, PackedArchive, Packager};
pub use preview::{render_preview, sandboxed_frame, PreviewDocument};
pub use reconciler::{merge, partition_for_refine, RefinePartition};
pub use utils::{FileKind, PathResolver};
pub use workbench::Workbench;
