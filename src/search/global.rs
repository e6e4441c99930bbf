use std::collections::HashSet;
use std::time::Instant;

use super::{fold_str, MatchSet, SearchOutcome};
use crate::config::ViewerConfig;
use crate::highlight::HighlightState;
use crate::models::Entry;
use crate::storage::EntryStore;
use crate::table::EntryTable;

/// A matching table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMatch {
    pub row: usize,
    pub id: String,
}

/// Substring search over every entry of a store.
pub struct GlobalSearch;

impl GlobalSearch {
    /// Search every entry for `query`. Matches are reported as rows of `table`
    /// in ascending order, one per entry however many fields matched.
    pub fn search(
        store: &EntryStore,
        table: &EntryTable,
        query: &str,
        case_sensitive: bool,
    ) -> SearchOutcome<RowMatch> {
        if query.is_empty() {
            return SearchOutcome::NoQuery;
        }

        let started = Instant::now();
        let needle = if case_sensitive {
            query.to_string()
        } else {
            fold_str(query)
        };
        let matched: HashSet<&str> = store
            .iter()
            .filter(|entry| entry_matches(entry, &needle, case_sensitive))
            .map(|entry| entry.id.as_str())
            .collect();

        let rows: Vec<RowMatch> = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, id)| matched.contains(id.as_str()))
            .map(|(row, id)| RowMatch {
                row,
                id: id.clone(),
            })
            .collect();

        tracing::info!(
            "Search Result: Found {} matching entries in {:.1} seconds.",
            rows.len(),
            started.elapsed().as_secs_f64()
        );

        if rows.is_empty() {
            SearchOutcome::NoMatches
        } else {
            SearchOutcome::Matches(MatchSet::new(rows))
        }
    }

    /// [`GlobalSearch::search`] with case sensitivity taken from `config`.
    pub fn search_with(
        store: &EntryStore,
        table: &EntryTable,
        query: &str,
        config: &ViewerConfig,
    ) -> SearchOutcome<RowMatch> {
        Self::search(store, table, query, config.case_sensitive_matching)
    }

    /// Search and mark the matching rows in `highlights`. Any previous search
    /// highlighting is cleared first, even when the new query is empty.
    pub fn search_and_highlight(
        store: &EntryStore,
        table: &EntryTable,
        query: &str,
        config: &ViewerConfig,
        highlights: &mut HighlightState,
    ) -> SearchOutcome<RowMatch> {
        highlights.clear_search();
        let outcome = Self::search_with(store, table, query, config);
        if let SearchOutcome::Matches(set) = &outcome {
            highlights.apply_search(set.matches().iter().map(|m| m.id.as_str()));
        }
        outcome
    }
}

fn entry_matches(entry: &Entry, needle: &str, case_sensitive: bool) -> bool {
    let text = entry.searchable_text();
    if case_sensitive {
        text.contains(needle)
    } else {
        fold_str(&text).contains(needle)
    }
}

impl MatchSet<RowMatch> {
    /// Next match after the selected row; steps past the selection when the
    /// selected row is itself a match.
    pub fn next_from_row(&mut self, selected: usize) -> Option<&RowMatch> {
        self.next_after(selected, |m| m.row)
    }

    pub fn previous_from_row(&mut self, selected: usize) -> Option<&RowMatch> {
        self.previous_before(selected, |m| m.row)
    }

    pub fn rows(&self) -> Vec<usize> {
        self.matches().iter().map(|m| m.row).collect()
    }
}
