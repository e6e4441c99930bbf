use super::{fold_case, fold_str, MatchSet, SearchOutcome};
use crate::config::ViewerConfig;
use crate::highlight::Paint;
use crate::models::Entry;
use crate::panels::{render_panel, render_panel_full, PanelKind, RenderedPanel, Side};

/// Byte range of a match inside a panel's text. Always on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextSpan {
    pub start: usize,
    pub len: usize,
}

impl TextSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// Every non-overlapping occurrence of `query` in `text`, left to right.
pub fn find_spans(text: &str, query: &str, case_sensitive: bool) -> Vec<TextSpan> {
    if query.is_empty() {
        return Vec::new();
    }
    if case_sensitive {
        return text
            .match_indices(query)
            .map(|(start, hit)| TextSpan {
                start,
                len: hit.len(),
            })
            .collect();
    }

    let (folded, origin) = fold_case(text);
    let needle = fold_str(query);
    let mut spans: Vec<TextSpan> = Vec::new();
    for (at, hit) in folded.match_indices(needle.as_str()) {
        let start = origin[at].0;
        let end = origin[at + hit.len() - 1].1;
        // one source char can lower to several; two hits may land in it
        if spans.last().is_some_and(|prev| start < prev.end()) {
            continue;
        }
        spans.push(TextSpan {
            start,
            len: end - start,
        });
    }
    spans
}

/// Substring search over the text of a single panel.
pub struct PanelSearch;

impl PanelSearch {
    pub fn search(text: &str, query: &str, case_sensitive: bool) -> SearchOutcome<TextSpan> {
        if query.is_empty() {
            return SearchOutcome::NoQuery;
        }
        let spans = find_spans(text, query, case_sensitive);
        tracing::debug!("panel search: {} spans for {:?}", spans.len(), query);
        if spans.is_empty() {
            SearchOutcome::NoMatches
        } else {
            SearchOutcome::Matches(MatchSet::new(spans))
        }
    }
}

/// One rendered panel with its search highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    kind: PanelKind,
    text: String,
    truncated: bool,
    highlights: Vec<TextSpan>,
    cursor: usize,
}

impl PanelView {
    pub fn new(kind: PanelKind, rendered: RenderedPanel) -> Self {
        Self {
            kind,
            text: rendered.text,
            truncated: rendered.truncated,
            highlights: Vec::new(),
            cursor: 0,
        }
    }

    pub fn empty(kind: PanelKind) -> Self {
        Self::new(kind, RenderedPanel::default())
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Panels without text are shown disabled.
    pub fn is_enabled(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn highlights(&self) -> &[TextSpan] {
        &self.highlights
    }

    /// Byte offset of the text cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.text.len());
    }

    /// Replace the highlighting with the matches of `query`. With zero
    /// matches the panel ends up exactly as after [`PanelView::clear`].
    pub fn apply_search(&mut self, query: &str, case_sensitive: bool) -> SearchOutcome<TextSpan> {
        self.clear();
        let outcome = PanelSearch::search(&self.text, query, case_sensitive);
        if let SearchOutcome::Matches(set) = &outcome {
            self.highlights = set.matches().to_vec();
            if let Some(first) = set.current() {
                self.cursor = first.start;
            }
        }
        outcome
    }

    /// Drop every highlight and put the cursor at the start of the text.
    pub fn clear(&mut self) {
        self.highlights.clear();
        self.cursor = 0;
    }

    pub fn span_paint(&self, offset: usize) -> Paint {
        if self.highlights.iter().any(|span| span.contains(offset)) {
            Paint::SearchMatch
        } else {
            Paint::Default
        }
    }

    fn replace_text(&mut self, rendered: RenderedPanel) {
        self.clear();
        self.text = rendered.text;
        self.truncated = rendered.truncated;
    }
}

#[derive(Debug, Clone, Default)]
struct SideState {
    active: Option<PanelKind>,
    matches: Option<MatchSet<TextSpan>>,
}

/// Detail panels of the selected entry, both sides.
///
/// Each side has one active panel and at most one live match set. The match
/// set is dropped whenever the text it indexes may have changed: another
/// entry is loaded, another panel is activated, or a body is expanded.
#[derive(Debug, Clone)]
pub struct DetailView {
    entry_id: Option<String>,
    panels: Vec<PanelView>,
    request: SideState,
    response: SideState,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            entry_id: None,
            panels: PanelKind::ALL.into_iter().map(PanelView::empty).collect(),
            request: SideState::default(),
            response: SideState::default(),
        }
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    /// Render every panel for `entry`. Highlights and match sets of both
    /// sides are dropped; the headers panel of each side becomes active.
    pub fn load_entry(&mut self, entry: &Entry, config: &ViewerConfig) {
        self.panels = PanelKind::ALL
            .into_iter()
            .map(|kind| PanelView::new(kind, render_panel(entry, kind, config)))
            .collect();
        self.entry_id = Some(entry.id.clone());
        self.request = SideState::default();
        self.response = SideState::default();
        tracing::debug!("detail view loaded entry {}", entry.id);
    }

    pub fn panel(&self, kind: PanelKind) -> &PanelView {
        &self.panels[Self::slot(kind)]
    }

    pub fn active(&self, side: Side) -> PanelKind {
        self.state(side)
            .active
            .unwrap_or_else(|| PanelKind::headers(side))
    }

    pub fn active_panel(&self, side: Side) -> &PanelView {
        self.panel(self.active(side))
    }

    /// Switch the active panel of `kind`'s side.
    pub fn set_active(&mut self, kind: PanelKind) {
        let side = kind.side();
        self.clear_search(side);
        self.state_mut(side).active = Some(kind);
    }

    /// Search the active panel of `side`, replacing any previous search there.
    pub fn search(&mut self, side: Side, query: &str, case_sensitive: bool) -> SearchOutcome<TextSpan> {
        self.clear_search(side);
        let slot = Self::slot(self.active(side));
        let outcome = self.panels[slot].apply_search(query, case_sensitive);
        if let SearchOutcome::Matches(set) = &outcome {
            self.state_mut(side).matches = Some(set.clone());
        }
        outcome
    }

    pub fn matches(&self, side: Side) -> Option<&MatchSet<TextSpan>> {
        self.state(side).matches.as_ref()
    }

    /// Advance to the next match of `side`, wrapping around.
    pub fn next_match(&mut self, side: Side) -> Option<TextSpan> {
        let span = self.state_mut(side).matches.as_mut()?.next().copied()?;
        self.follow(side, span);
        Some(span)
    }

    pub fn previous_match(&mut self, side: Side) -> Option<TextSpan> {
        let span = self.state_mut(side).matches.as_mut()?.previous().copied()?;
        self.follow(side, span);
        Some(span)
    }

    /// Drop the search of `side`. Clears every panel on that side.
    pub fn clear_search(&mut self, side: Side) {
        for kind in PanelKind::of_side(side) {
            self.panels[Self::slot(kind)].clear();
        }
        self.state_mut(side).matches = None;
    }

    /// Show the untruncated body of `side`.
    pub fn expand_body(&mut self, side: Side, entry: &Entry, config: &ViewerConfig) {
        let kind = match side {
            Side::Request => PanelKind::RequestBody,
            Side::Response => PanelKind::ResponseBody,
        };
        if !self.panel(kind).truncated() {
            return;
        }
        if self.active(side) == kind {
            self.state_mut(side).matches = None;
        }
        self.panels[Self::slot(kind)].replace_text(render_panel_full(entry, kind, config));
    }

    fn follow(&mut self, side: Side, span: TextSpan) {
        let slot = Self::slot(self.active(side));
        self.panels[slot].move_cursor(span.start);
        tracing::debug!("panel cursor moved to {}", span.start);
    }

    fn slot(kind: PanelKind) -> usize {
        PanelKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or_default()
    }

    fn state(&self, side: Side) -> &SideState {
        match side {
            Side::Request => &self.request,
            Side::Response => &self.response,
        }
    }

    fn state_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Request => &mut self.request,
            Side::Response => &mut self.response,
        }
    }
}
