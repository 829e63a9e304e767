//! Persistent, most-recent-first list of past results

pub mod backend;
pub mod selection;

pub use backend::{HistoryBackend, JsonFileBackend, MemoryBackend};
pub use selection::Selection;

use crate::error::Result;
use crate::models::HistoryRecord;
use serde_json::Value;
use std::collections::HashSet;

/// History list with write-through persistence.
///
/// Every mutation is persisted before it becomes visible in memory, so a
/// failed write leaves both sides as they were.
pub struct HistoryStore<B: HistoryBackend> {
    backend: B,
    records: Vec<HistoryRecord>,
}

impl<B: HistoryBackend> HistoryStore<B> {
    /// Load persisted history. Missing, corrupt or non-array data yields an
    /// empty list; malformed records inside a list are skipped.
    pub fn load(backend: B) -> Self {
        let records = match backend.read() {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("could not read history: {:#}", e);
                Vec::new()
            }
        };
        Self { backend, records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record at the front
    pub fn append(&mut self, record: HistoryRecord) -> Result<()> {
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record);
        next.extend(self.records.iter().cloned());
        self.commit(next)
    }

    /// Remove one record. Unknown ids are a no-op and return `false`.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next = self.records.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Remove every record whose id is in `ids`; returns how many went
    pub fn remove_many(&mut self, ids: &HashSet<String>) -> Result<usize> {
        let next: Vec<HistoryRecord> = self
            .records
            .iter()
            .filter(|r| !ids.contains(&r.id))
            .cloned()
            .collect();
        let removed = self.records.len() - next.len();
        if removed > 0 {
            self.commit(next)?;
        }
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<HistoryRecord>) -> Result<()> {
        let raw = serde_json::to_string(&next)?;
        self.backend.write(&raw)?;
        self.records = next;
        Ok(())
    }
}

fn decode(raw: &str) -> Vec<HistoryRecord> {
    let items: Vec<Value> = match serde_json::from_str(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("history is not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("history is not valid JSON, starting empty: {}", e);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<HistoryRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping malformed history record {}: {}", index, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileEntry, FileSet};

    fn record(name: &str) -> HistoryRecord {
        HistoryRecord::new(
            name,
            FileSet::from_entries(vec![FileEntry::new("manifest.json", "{}")]),
            None,
        )
    }

    #[test]
    fn test_append_is_most_recent_first_and_persisted() {
        let mut store = HistoryStore::load(MemoryBackend::default());
        store.append(record("first")).unwrap();
        store.append(record("second")).unwrap();

        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);

        let reloaded = HistoryStore::load(store.backend.clone());
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = HistoryStore::load(MemoryBackend::default());
        store.append(record("only")).unwrap();
        let writes = store.backend.write_count();

        assert!(!store.remove("missing").unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend.write_count(), writes);
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut store = HistoryStore::load(MemoryBackend::default());
        store.append(record("a")).unwrap();
        store.append(record("b")).unwrap();
        let id = store.records()[1].id.clone();

        assert!(store.remove(&id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name, "b");
    }

    #[test]
    fn test_remove_many() {
        let mut store = HistoryStore::load(MemoryBackend::default());
        for name in ["a", "b", "c"] {
            store.append(record(name)).unwrap();
        }
        let ids: HashSet<String> = store.records()[..2].iter().map(|r| r.id.clone()).collect();

        assert_eq!(store.remove_many(&ids).unwrap(), 2);
        assert_eq!(store.records()[0].name, "a");
        assert_eq!(store.remove_many(&HashSet::new()).unwrap(), 0);
    }

    #[test]
    fn test_corrupt_or_non_array_loads_empty() {
        for raw in ["{ not json", r#"{"id":"x"}"#, r#"[{"id":1}]"#, "42"] {
            let store = HistoryStore::load(MemoryBackend::with_contents(raw));
            assert!(store.is_empty(), "expected empty history for {}", raw);
        }
    }

    #[test]
    fn test_malformed_records_skipped_and_rest_kept() {
        let good = serde_json::to_value(record("good")).unwrap();
        let broken = serde_json::json!({"id": "x", "name": "broken"});
        let raw = serde_json::to_string(&vec![good, broken]).unwrap();
        let backend = MemoryBackend::with_contents(&raw);

        let mut store = HistoryStore::load(backend.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name, "good");

        store.append(record("newer")).unwrap();
        let reloaded = HistoryStore::load(backend);
        let names: Vec<&str> = reloaded.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["newer", "good"]);
    }

    #[test]
    fn test_failed_write_keeps_memory() {
        let backend = MemoryBackend::default();
        let mut store = HistoryStore::load(backend.clone());
        store.append(record("kept")).unwrap();

        backend.fail_writes(true);
        assert!(store.append(record("lost")).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name, "kept");
    }
}
