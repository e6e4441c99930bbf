use crate::models::{Entry, LogSummary};
use std::collections::HashMap;

/// Normalized entries of one imported HAR file.
///
/// Built once by the normalizer and read-only afterwards. Opening another file
/// produces a new store instead of mutating this one.
#[derive(Debug, Clone)]
pub struct EntryStore {
    summary: LogSummary,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl EntryStore {
    pub fn new(summary: LogSummary, entries: Vec<Entry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id.clone(), pos))
            .collect();
        Self {
            summary,
            entries,
            index,
        }
    }

    pub fn summary(&self) -> &LogSummary {
        &self.summary
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// Position of `id` in import order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Entries in import order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
