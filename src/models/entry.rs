//! Canonical HAR entry model
//!
//! Represents a single normalized request/response transaction. Every field
//! is always present; unknown values carry a sentinel instead of `None` so the
//! table can sort numeric columns uniformly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel for unknown numeric fields.
pub const UNKNOWN_NUMBER: i64 = -1;

/// Sentinel for unknown timing fields.
pub const UNKNOWN_TIMING: f64 = -1.0;

/// Sentinel for a URL whose scheme could not be extracted.
pub const UNKNOWN_PROTOCOL: &str = "unknown";

/// Header, query parameter or form parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A cookie as found in the capture.
///
/// HAR producers either supply structured cookie objects or leave the array
/// empty, in which case cookies are reconstructed from the raw headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cookie {
    /// Cookie object from the HAR `cookies` array
    Structured {
        name: String,
        value: String,
        /// Remaining keys (path, domain, expires, ...) in input order
        attributes: Vec<NameValue>,
    },
    /// One `name=value` pair split out of a `Cookie` request header
    Raw(String),
    /// One `Set-Cookie` instance split into its `;`-separated segments
    RawAttributes(Vec<String>),
}

impl Cookie {
    /// Uniform textual view regardless of how the cookie was obtained.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Cookie::Structured {
                name,
                value,
                attributes,
            } => std::iter::once(format!("{}={}", name, value))
                .chain(
                    attributes
                        .iter()
                        .map(|attr| format!("{}={}", attr.name, attr.value)),
                )
                .collect(),
            Cookie::Raw(raw) => vec![raw.clone()],
            Cookie::RawAttributes(parts) => parts.clone(),
        }
    }

    /// Cookie name, when one can be determined.
    pub fn name(&self) -> Option<&str> {
        match self {
            Cookie::Structured { name, .. } => Some(name.as_str()),
            Cookie::Raw(raw) => raw.split('=').next(),
            Cookie::RawAttributes(parts) => parts.first().and_then(|p| p.split('=').next()),
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PostData {
    pub mime_type: String,
    pub text: String,
    pub params: Vec<NameValue>,
}

/// Response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub mime_type: String,
    pub text: String,
    pub size: i64,
    pub encoding: String,
    pub compression: i64,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            mime_type: String::new(),
            text: String::new(),
            size: UNKNOWN_NUMBER,
            encoding: String::new(),
            compression: UNKNOWN_NUMBER,
        }
    }
}

/// Request half of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    /// Lowercase URL scheme, or [`UNKNOWN_PROTOCOL`]
    pub protocol: String,
    pub http_version: String,
    pub headers: Vec<NameValue>,
    pub cookies: Vec<Cookie>,
    pub query_params: Vec<NameValue>,
    pub post_data: PostData,
    pub headers_size: i64,
    pub body_size: i64,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: String::new(),
            url: String::new(),
            protocol: UNKNOWN_PROTOCOL.to_string(),
            http_version: String::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            query_params: Vec::new(),
            post_data: PostData::default(),
            headers_size: UNKNOWN_NUMBER,
            body_size: UNKNOWN_NUMBER,
        }
    }
}

/// Response half of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: i64,
    pub status_text: String,
    pub http_version: String,
    pub headers: Vec<NameValue>,
    pub cookies: Vec<Cookie>,
    pub content: Content,
    pub redirect_url: String,
    pub headers_size: i64,
    pub body_size: i64,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: UNKNOWN_NUMBER,
            status_text: String::new(),
            http_version: String::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            content: Content::default(),
            redirect_url: String::new(),
            headers_size: UNKNOWN_NUMBER,
            body_size: UNKNOWN_NUMBER,
        }
    }
}

/// Phase timings in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    pub blocked: f64,
    pub dns: f64,
    pub connect: f64,
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
    pub ssl: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            blocked: UNKNOWN_TIMING,
            dns: UNKNOWN_TIMING,
            connect: UNKNOWN_TIMING,
            send: UNKNOWN_TIMING,
            wait: UNKNOWN_TIMING,
            receive: UNKNOWN_TIMING,
            ssl: UNKNOWN_TIMING,
        }
    }
}

/// Represents a single normalized HAR entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier within one imported file
    pub id: String,
    /// Raw `startedDateTime`, display only
    pub started_at: String,
    /// Total elapsed time in ms
    pub total_time: f64,
    pub server_ip: String,
    pub connection_id: String,
    pub request: Request,
    pub response: Response,
    pub timings: Timings,
    pub saml_request: String,
    pub saml_response: String,
}

impl Entry {
    /// Create an entry with every field at its sentinel default.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: String::new(),
            total_time: UNKNOWN_TIMING,
            server_ip: String::new(),
            connection_id: String::new(),
            request: Request::default(),
            response: Response::default(),
            timings: Timings::default(),
            saml_request: String::new(),
            saml_response: String::new(),
        }
    }

    /// Text scanned by the global search: every scalar value of the record
    /// except the id, one per line.
    pub fn searchable_text(&self) -> String {
        let mut out = String::new();
        if let Ok(Value::Object(mut fields)) = serde_json::to_value(self) {
            fields.remove("id");
            for value in fields.values() {
                collect_scalars(value, &mut out);
            }
        }
        out
    }
}

fn collect_scalars(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            out.push_str(s);
            out.push('\n');
        }
        Value::Bool(_) | Value::Number(_) => {
            out.push_str(&value.to_string());
            out.push('\n');
        }
        Value::Array(items) => items.iter().for_each(|item| collect_scalars(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_scalars(item, out)),
    }
}

/// Metadata of the imported log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub version: String,
    pub creator_name: String,
    pub creator_version: String,
    pub browser_name: String,
    pub browser_version: String,
    pub entry_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_holds_sentinels() {
        let entry = Entry::new("abc");
        assert_eq!(entry.request.protocol, UNKNOWN_PROTOCOL);
        assert_eq!(entry.response.status, -1);
        assert_eq!(entry.response.content.compression, -1);
        assert_eq!(entry.timings.ssl, -1.0);
        assert!(entry.request.cookies.is_empty());
    }

    #[test]
    fn searchable_text_skips_id_and_unescapes() {
        let mut entry = Entry::new("needle-id");
        entry.response.content.text = "say \"hi\"\nbye".to_string();
        let text = entry.searchable_text();
        assert!(!text.contains("needle-id"));
        assert!(text.contains("say \"hi\"\nbye"));
    }

    #[test]
    fn cookie_segments_are_uniform() {
        let structured = Cookie::Structured {
            name: "sid".into(),
            value: "1".into(),
            attributes: vec![NameValue::new("path", "/")],
        };
        assert_eq!(structured.segments(), vec!["sid=1", "path=/"]);
        assert_eq!(Cookie::Raw("a=1".into()).segments(), vec!["a=1"]);
        assert_eq!(
            Cookie::RawAttributes(vec!["x=1".into(), "Path=/".into()]).name(),
            Some("x")
        );
    }
}
