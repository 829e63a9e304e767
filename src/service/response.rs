//! Validation of generation responses

use crate::error::{Result, WizardError};
use crate::models::{FileEntry, FileSet};
use serde_json::Value;

/// Parse a model response into a file set.
///
/// The response must be a non-empty JSON array whose elements are objects
/// with string `name` and `content` fields. Repeated names keep the last
/// content.
pub fn parse_generated_files(text: &str) -> Result<FileSet> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        WizardError::InvalidGeneration(format!("response is not valid JSON: {}", e))
    })?;

    let items = value.as_array().ok_or_else(|| {
        WizardError::InvalidGeneration("expected a JSON array of files".to_string())
    })?;

    if items.is_empty() {
        return Err(WizardError::InvalidGeneration(
            "the model returned no files".to_string(),
        ));
    }

    let mut files = FileSet::new();
    for (index, item) in items.iter().enumerate() {
        let name = item.get("name").and_then(Value::as_str);
        let content = item.get("content").and_then(Value::as_str);
        match (name, content) {
            (Some(name), Some(content)) if !name.is_empty() => {
                files.insert(FileEntry::new(name, content));
            }
            _ => {
                return Err(WizardError::InvalidGeneration(format!(
                    "item {} is not a {{name, content}} pair of strings",
                    index
                )));
            }
        }
    }

    Ok(files)
}
