//! Global and panel search
//!
//! Both engines are stateless: each call returns a fresh [`SearchOutcome`].
//! The caller keeps the resulting [`MatchSet`] between "next match" requests
//! and drops it when the query, the active panel or the selection changes.

pub mod global;
pub mod panel;

pub use global::{GlobalSearch, RowMatch};
pub use panel::{find_spans, DetailView, PanelSearch, PanelView, TextSpan};

/// Result of one search invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    /// Empty query; nothing was searched.
    NoQuery,
    NoMatches,
    Matches(MatchSet<T>),
}

impl<T> SearchOutcome<T> {
    pub fn match_count(&self) -> usize {
        match self {
            SearchOutcome::Matches(set) => set.len(),
            _ => 0,
        }
    }

    pub fn into_matches(self) -> Option<MatchSet<T>> {
        match self {
            SearchOutcome::Matches(set) => Some(set),
            _ => None,
        }
    }

    /// Status line shown after a search.
    pub fn status_message(&self) -> String {
        match self {
            SearchOutcome::NoQuery => String::new(),
            SearchOutcome::NoMatches => "No matches found".to_string(),
            SearchOutcome::Matches(set) => {
                format!("Search Result: Found {} matching entries.", set.len())
            }
        }
    }
}

/// Ordered matches with a wrap-around cursor.
///
/// The cursor starts on the first match, which the caller selects right after
/// the search; `next` therefore never returns the match the selection is
/// already on.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSet<T> {
    matches: Vec<T>,
    cursor: usize,
}

impl<T> MatchSet<T> {
    pub fn new(matches: Vec<T>) -> Self {
        Self { matches, cursor: 0 }
    }

    pub fn matches(&self) -> &[T] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&T> {
        self.matches.get(self.cursor)
    }

    pub fn next(&mut self) -> Option<&T> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.matches.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<&T> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.matches.len() - 1) % self.matches.len();
        self.current()
    }

    /// Move to the first match strictly after `position` (by `key`), wrapping to
    /// the first match. Matches must be sorted by `key`.
    pub fn next_after<K: Ord>(&mut self, position: K, key: impl Fn(&T) -> K) -> Option<&T> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = self
            .matches
            .iter()
            .position(|m| key(m) > position)
            .unwrap_or(0);
        self.current()
    }

    /// Move to the last match strictly before `position`, wrapping to the last.
    pub fn previous_before<K: Ord>(&mut self, position: K, key: impl Fn(&T) -> K) -> Option<&T> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = self
            .matches
            .iter()
            .rposition(|m| key(m) < position)
            .unwrap_or(self.matches.len() - 1);
        self.current()
    }
}

/// Fold one character for case-insensitive matching. Final sigma folds to
/// `σ` like its capital, so `ΟΔΟΣ` and `οδος` compare equal.
fn fold_char(ch: char) -> impl Iterator<Item = char> {
    ch.to_lowercase()
        .map(|lower| if lower == 'ς' { 'σ' } else { lower })
}

/// Case-fold `text` one character at a time. Unlike `str::to_lowercase`
/// this has no context rules, so a query and the text it is matched against
/// always fold the same way.
pub(crate) fn fold_str(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Case-fold `text` like [`fold_str`] while remembering, for every byte of
/// the result, the byte range of the original character it came from.
pub(crate) fn fold_case(text: &str) -> (String, Vec<(usize, usize)>) {
    let mut folded = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (start, ch) in text.char_indices() {
        let end = start + ch.len_utf8();
        for lower in fold_char(ch) {
            folded.push(lower);
            origin.extend(std::iter::repeat((start, end)).take(lower.len_utf8()));
        }
    }
    (folded, origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_previous_wrap() {
        let mut set = MatchSet::new(vec![3, 7, 9]);
        assert_eq!(set.current(), Some(&3));
        assert_eq!(set.next(), Some(&7));
        assert_eq!(set.next(), Some(&9));
        assert_eq!(set.next(), Some(&3));
        assert_eq!(set.previous(), Some(&9));
    }

    #[test]
    fn next_after_skips_current_position() {
        let mut set = MatchSet::new(vec![3, 7, 9]);
        assert_eq!(set.next_after(7, |m| *m), Some(&9));
        assert_eq!(set.next_after(9, |m| *m), Some(&3));
        assert_eq!(set.next_after(4, |m| *m), Some(&7));
        assert_eq!(set.previous_before(7, |m| *m), Some(&3));
        assert_eq!(set.previous_before(3, |m| *m), Some(&9));
    }

    #[test]
    fn empty_set_navigation_is_inert() {
        let mut set: MatchSet<usize> = MatchSet::new(Vec::new());
        assert_eq!(set.next(), None);
        assert_eq!(set.previous(), None);
        assert_eq!(set.next_after(1, |m| *m), None);
        assert!(set.is_empty());
    }

    #[test]
    fn fold_case_maps_back_to_source_chars() {
        let (folded, origin) = fold_case("AÉb");
        assert_eq!(folded, "aéb");
        assert_eq!(origin[0], (0, 1));
        assert_eq!(origin[1], (1, 3));
        assert_eq!(origin[2], (1, 3));
        assert_eq!(origin[3], (3, 4));
    }

    #[test]
    fn word_final_sigma_folds_like_any_other() {
        assert_eq!(fold_str("ΟΔΟΣ"), "οδοσ");
        assert_eq!(fold_str("οδος"), "οδοσ");
        assert_eq!(fold_case("ΟΔΟΣ").0, fold_str("ΟΔΟΣ"));
    }
}
