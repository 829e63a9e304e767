//! Multi-select state over history records

use crate::models::HistoryRecord;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Select every record, or clear when everything is already selected
    pub fn toggle_all(&mut self, records: &[HistoryRecord]) {
        if self.ids.len() == records.len() {
            self.ids.clear();
        } else {
            self.ids = records.iter().map(|r| r.id.clone()).collect();
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
