//! User-supplied inputs that are not part of the generated file set

use serde::{Deserialize, Serialize};

/// Auxiliary file handed to the generation service as context, and copied
/// into packaged archives before generated files are laid over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAsset {
    pub name: String,
    /// Text, or base64 when `is_binary` is set
    pub content: String,
    pub is_binary: bool,
}

impl ReferenceAsset {
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            is_binary: false,
        }
    }

    pub fn binary(name: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: base64.into(),
            is_binary: true,
        }
    }
}

/// Raw image supplied by the user as the extension icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}
