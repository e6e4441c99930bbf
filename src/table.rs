//! Entries table model
//!
//! The presentation layer renders one row per entry. Global search results
//! are expressed as positions in the table's current row order, so the order
//! (and any sort applied to it) lives here rather than in the widget.

use chrono::DateTime;
use std::cmp::Ordering;

use crate::models::Entry;
use crate::storage::EntryStore;

/// Table columns in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    RequestId,
    Timestamp,
    ServerIp,
    ConnectionId,
    Method,
    Protocol,
    Url,
    RequestHttpVersion,
    Status,
    StatusText,
    MimeType,
    ResponseHttpVersion,
    RedirectUrl,
    RequestHeaderSize,
    RequestBodySize,
    ResponseHeaderSize,
    ResponseBodySize,
    ContentSize,
    Time,
    Blocked,
    Dns,
    Connect,
    Send,
    Wait,
    Receive,
    Ssl,
}

/// Sort key of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Column {
    pub const ALL: [Column; 26] = [
        Column::RequestId,
        Column::Timestamp,
        Column::ServerIp,
        Column::ConnectionId,
        Column::Method,
        Column::Protocol,
        Column::Url,
        Column::RequestHttpVersion,
        Column::Status,
        Column::StatusText,
        Column::MimeType,
        Column::ResponseHttpVersion,
        Column::RedirectUrl,
        Column::RequestHeaderSize,
        Column::RequestBodySize,
        Column::ResponseHeaderSize,
        Column::ResponseBodySize,
        Column::ContentSize,
        Column::Time,
        Column::Blocked,
        Column::Dns,
        Column::Connect,
        Column::Send,
        Column::Wait,
        Column::Receive,
        Column::Ssl,
    ];

    pub fn index(&self) -> usize {
        Column::ALL
            .iter()
            .position(|column| column == self)
            .unwrap_or_default()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Column::RequestId => "Request ID",
            Column::Timestamp => "Timestamp",
            Column::ServerIp => "Server IP",
            Column::ConnectionId => "Connection ID",
            Column::Method => "Method",
            Column::Protocol => "Protocol",
            Column::Url => "URL",
            Column::RequestHttpVersion => "HTTP Version (Request)",
            Column::Status => "Status",
            Column::StatusText => "Status Text",
            Column::MimeType => "MIME-Type",
            Column::ResponseHttpVersion => "HTTP Version (Response)",
            Column::RedirectUrl => "Redirect URL",
            Column::RequestHeaderSize => "Request Header Size",
            Column::RequestBodySize => "Request Body Size",
            Column::ResponseHeaderSize => "Response Header Size",
            Column::ResponseBodySize => "Response Body Size",
            Column::ContentSize => "Content Size",
            Column::Time => "Time",
            Column::Blocked => "Blocked",
            Column::Dns => "DNS",
            Column::Connect => "Connect",
            Column::Send => "Send",
            Column::Wait => "Wait",
            Column::Receive => "Receive",
            Column::Ssl => "SSL",
        }
    }

    /// Case-insensitive lookup by title or by a kebab-case name such as `status-text`.
    pub fn from_name(name: &str) -> Option<Column> {
        let wanted = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Column::ALL
            .into_iter()
            .find(|column| column.title().to_ascii_lowercase() == wanted)
    }

    fn number(&self, entry: &Entry) -> Option<f64> {
        let value = match self {
            Column::Status => entry.response.status as f64,
            Column::RequestHeaderSize => entry.request.headers_size as f64,
            Column::RequestBodySize => entry.request.body_size as f64,
            Column::ResponseHeaderSize => entry.response.headers_size as f64,
            Column::ResponseBodySize => entry.response.body_size as f64,
            Column::ContentSize => entry.response.content.size as f64,
            Column::Time => entry.total_time,
            Column::Blocked => entry.timings.blocked,
            Column::Dns => entry.timings.dns,
            Column::Connect => entry.timings.connect,
            Column::Send => entry.timings.send,
            Column::Wait => entry.timings.wait,
            Column::Receive => entry.timings.receive,
            Column::Ssl => entry.timings.ssl,
            _ => return None,
        };
        Some(value)
    }

    /// Display text of the cell.
    pub fn cell_text(&self, entry: &Entry) -> String {
        if let Some(value) = self.number(entry) {
            return format!("{}", value.trunc() as i64);
        }
        match self {
            Column::RequestId => entry.id.clone(),
            Column::Timestamp => entry.started_at.clone(),
            Column::ServerIp => entry.server_ip.clone(),
            Column::ConnectionId => entry.connection_id.clone(),
            Column::Method => entry.request.method.to_uppercase(),
            Column::Protocol => entry.request.protocol.to_uppercase(),
            Column::Url => entry.request.url.clone(),
            Column::RequestHttpVersion => entry.request.http_version.to_uppercase(),
            Column::StatusText => entry.response.status_text.clone(),
            Column::MimeType => entry.response.content.mime_type.to_lowercase(),
            Column::ResponseHttpVersion => entry.response.http_version.to_uppercase(),
            Column::RedirectUrl => entry.response.redirect_url.clone(),
            _ => String::new(),
        }
    }

    /// Numeric columns sort by value, timestamps chronologically when they
    /// parse as RFC 3339, everything else by display text.
    pub fn sort_key(&self, entry: &Entry) -> SortKey {
        if let Some(value) = self.number(entry) {
            return SortKey::Number(value);
        }
        if *self == Column::Timestamp {
            if let Ok(at) = DateTime::parse_from_rfc3339(&entry.started_at) {
                return SortKey::Number(at.timestamp_millis() as f64);
            }
        }
        SortKey::Text(self.cell_text(entry))
    }
}

/// Current row order of the entries table.
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    rows: Vec<String>,
    sort: Option<(Column, SortOrder)>,
}

impl EntryTable {
    /// Rows in import order.
    pub fn from_store(store: &EntryStore) -> Self {
        Self {
            rows: store.ids().map(String::from).collect(),
            sort: None,
        }
    }

    /// Stable sort of the rows by `column`.
    pub fn sort_by(&mut self, store: &EntryStore, column: Column, order: SortOrder) {
        let mut keyed: Vec<(SortKey, String)> = self
            .rows
            .drain(..)
            .map(|id| {
                let key = store
                    .get(&id)
                    .map(|entry| column.sort_key(entry))
                    .unwrap_or(SortKey::Text(String::new()));
                (key, id)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| match order {
            SortOrder::Ascending => a.compare(b),
            SortOrder::Descending => b.compare(a),
        });
        self.rows = keyed.into_iter().map(|(_, id)| id).collect();
        self.sort = Some((column, order));
    }

    pub fn sorting(&self) -> Option<(Column, SortOrder)> {
        self.sort
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row == id)
    }

    pub fn id_at(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogSummary;

    fn store() -> EntryStore {
        let mut a = Entry::new("a");
        a.response.status = 404;
        a.started_at = "2024-01-01T10:00:02Z".into();
        a.request.method = "post".into();
        let mut b = Entry::new("b");
        b.response.status = 200;
        b.started_at = "2024-01-01T10:00:01+00:00".into();
        let c = Entry::new("c");
        let summary = LogSummary {
            version: "1.2".into(),
            creator_name: "t".into(),
            creator_version: "1".into(),
            browser_name: "Unknown".into(),
            browser_version: "Unknown".into(),
            entry_count: 3,
        };
        EntryStore::new(summary, vec![a, b, c])
    }

    #[test]
    fn numeric_sort_puts_sentinels_first() {
        let store = store();
        let mut table = EntryTable::from_store(&store);
        table.sort_by(&store, Column::Status, SortOrder::Ascending);
        assert_eq!(table.rows(), ["c", "b", "a"]);
        table.sort_by(&store, Column::Status, SortOrder::Descending);
        assert_eq!(table.rows(), ["a", "b", "c"]);
        assert_eq!(table.row_of("b"), Some(1));
        assert_eq!(table.id_at(0), Some("a"));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let store = store();
        let mut table = EntryTable::from_store(&store);
        table.sort_by(&store, Column::Timestamp, SortOrder::Ascending);
        // the unparsable (empty) timestamp sorts after parsed ones
        assert_eq!(table.rows(), ["b", "a", "c"]);
    }

    #[test]
    fn cell_text_formats() {
        let store = store();
        let a = store.get("a").unwrap();
        assert_eq!(Column::Method.cell_text(a), "POST");
        assert_eq!(Column::Status.cell_text(a), "404");
        assert_eq!(Column::Dns.cell_text(a), "-1");
        assert_eq!(Column::Protocol.cell_text(a), "UNKNOWN");
    }

    #[test]
    fn column_lookup() {
        assert_eq!(Column::from_name("status-text"), Some(Column::StatusText));
        assert_eq!(Column::from_name("URL"), Some(Column::Url));
        assert_eq!(Column::from_name("bogus"), None);
        assert_eq!(Column::Ssl.index(), 25);
    }
}
