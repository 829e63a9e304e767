//! Past generation results

use super::file_set::FileSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the history list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub files: FileSet,
    pub summary: Option<String>,
}

impl HistoryRecord {
    /// New record with a fresh id and the current time
    pub fn new(name: impl Into<String>, files: FileSet, summary: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
            files,
            summary,
        }
    }
}
