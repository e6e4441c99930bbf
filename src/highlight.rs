//! Cell and span highlighting
//!
//! Three concerns share one visual surface: nothing, semantic colorization
//! (method, protocol and status class) and search-match highlighting. The
//! color of a cell is always recomputed from state by [`resolve_paint`], so
//! clearing a search restores exactly what was there before it.

use crate::config::ColorScheme;
use crate::models::Entry;
use crate::table::Column;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// What a cell or span is painted with.
///
/// Paints are compared by kind, never by color value, so a scheme that reuses
/// the search color for a method still clears correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Default,
    Semantic(Rgb),
    SearchMatch,
}

impl Paint {
    pub fn color(&self, scheme: &ColorScheme) -> Rgb {
        match self {
            Paint::Default => scheme.default_color(),
            Paint::Semantic(color) => *color,
            Paint::SearchMatch => scheme.search_match_color(),
        }
    }
}

/// Decide the paint of one cell. Semantic colorization is never overwritten
/// by a search match. Callers pass `None` for a semantic color that equals
/// the default background, so such cells still show search matches.
pub fn resolve_paint(semantic: Option<Rgb>, search_matched: bool) -> Paint {
    match (semantic, search_matched) {
        (Some(color), _) => Paint::Semantic(color),
        (None, true) => Paint::SearchMatch,
        (None, false) => Paint::Default,
    }
}

/// Semantic color of `column` for `entry`, if that column is colorized.
pub fn semantic_color(entry: &Entry, column: Column, scheme: &ColorScheme) -> Option<Rgb> {
    match column {
        Column::Method => scheme.method_color(&entry.request.method),
        Column::Protocol => scheme.protocol_color(&entry.request.protocol),
        Column::Status => scheme.status_color(entry.response.status),
        _ => None,
    }
}

/// Highlight state of the entries table.
///
/// Search matches are tracked by entry id so they survive re-sorting.
#[derive(Debug, Clone)]
pub struct HighlightState {
    colorization: bool,
    matched: HashSet<String>,
}

impl HighlightState {
    pub fn new(colorization: bool) -> Self {
        Self {
            colorization,
            matched: HashSet::new(),
        }
    }

    pub fn colorization(&self) -> bool {
        self.colorization
    }

    /// Toggle semantic colorization. Search highlighting is unaffected.
    pub fn set_colorization(&mut self, enabled: bool) {
        self.colorization = enabled;
    }

    /// Mark the rows of a search result. Replaces any previous result.
    pub fn apply_search<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.matched = ids.into_iter().map(String::from).collect();
    }

    /// Drop search highlighting only. Safe to call repeatedly.
    pub fn clear_search(&mut self) {
        self.matched.clear();
    }

    pub fn is_matched(&self, id: &str) -> bool {
        self.matched.contains(id)
    }

    pub fn has_search(&self) -> bool {
        !self.matched.is_empty()
    }

    pub fn cell_paint(&self, entry: &Entry, column: Column, scheme: &ColorScheme) -> Paint {
        let semantic = if self.colorization {
            semantic_color(entry, column, scheme).filter(|color| *color != scheme.default_color())
        } else {
            None
        };
        resolve_paint(semantic, self.is_matched(&entry.id))
    }

    pub fn cell_color(&self, entry: &Entry, column: Column, scheme: &ColorScheme) -> Rgb {
        self.cell_paint(entry, column, scheme).color(scheme)
    }
}
