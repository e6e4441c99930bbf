use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};
use flate2::read::DeflateDecoder;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use super::entry_store::EntryStore;
use crate::config::ViewerConfig;
use crate::error::ImportError;
use crate::models::{
    Content, Cookie, Entry, LogSummary, NameValue, PostData, Request, Response, Timings,
    UNKNOWN_NUMBER, UNKNOWN_PROTOCOL, UNKNOWN_TIMING,
};

/// Progress is reported (and the async import yields) every this many entries.
pub const PROGRESS_INTERVAL: usize = 250;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UNKNOWN_LOG_FIELD: &str = "Unknown";

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)://").expect("scheme pattern compiles"));

// Base64 never contains '&', so the capture stops at the first parameter boundary.
static SAML_RESPONSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"SAMLResponse=([^&]+)&RelayState").expect("SAMLResponse pattern compiles")
});

static NULL: Value = Value::Null;

/// Receives import progress so a host loop can repaint a progress indicator.
pub trait ImportProgress {
    fn on_progress(&mut self, processed: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ImportProgress for F {
    fn on_progress(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Progress sink that discards every report.
pub struct NoProgress;

impl ImportProgress for NoProgress {
    fn on_progress(&mut self, _processed: usize, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Total accessors: a missing key, `null` or a wrong type resolves to the
// caller's default and never fails.
// ---------------------------------------------------------------------------

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

fn str_or(value: &Value, key: &str, default: &str) -> String {
    match field(value, key) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => default.to_string(),
    }
}

fn number(value: &Value, key: &str) -> Option<f64> {
    let parsed = match field(value, key) {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn float_or(value: &Value, key: &str, default: f64) -> f64 {
    number(value, key).unwrap_or(default)
}

fn int_or(value: &Value, key: &str, default: i64) -> i64 {
    if let Value::Number(n) = field(value, key) {
        if let Some(exact) = n.as_i64() {
            return exact;
        }
    }
    number(value, key).map(|f| f as i64).unwrap_or(default)
}

fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    match field(value, key) {
        Value::Array(items) => items.as_slice(),
        _ => &[],
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn name_values(items: &[Value]) -> Vec<NameValue> {
    items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| NameValue {
            name: str_or(item, "name", ""),
            value: str_or(item, "value", ""),
        })
        .collect()
}

fn structured_cookies(items: &[Value]) -> Vec<Cookie> {
    items
        .iter()
        .filter_map(|item| item.as_object())
        .map(|obj| Cookie::Structured {
            name: obj.get("name").and_then(scalar_text).unwrap_or_default(),
            value: obj.get("value").and_then(scalar_text).unwrap_or_default(),
            attributes: obj
                .iter()
                .filter(|(key, _)| key.as_str() != "name" && key.as_str() != "value")
                .filter_map(|(key, value)| scalar_text(value).map(|v| NameValue::new(key, v)))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// Lowercase URL scheme, or [`UNKNOWN_PROTOCOL`] when the URL has none.
pub fn extract_protocol(url: &str) -> String {
    SCHEME
        .captures(url.trim_start())
        .map(|caps| caps[1].to_ascii_lowercase())
        .unwrap_or_else(|| UNKNOWN_PROTOCOL.to_string())
}

fn split_segments(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

/// Rebuild request cookies from `Cookie` headers.
pub fn cookies_from_request_headers(headers: &[NameValue]) -> Vec<Cookie> {
    headers
        .iter()
        .filter(|header| header.name.eq_ignore_ascii_case("cookie"))
        .flat_map(|header| split_segments(&header.value))
        .map(Cookie::Raw)
        .collect()
}

/// Rebuild response cookies from `Set-Cookie` headers. A single header value
/// may hold several newline-joined `Set-Cookie` instances.
pub fn cookies_from_response_headers(headers: &[NameValue]) -> Vec<Cookie> {
    headers
        .iter()
        .filter(|header| header.name.eq_ignore_ascii_case("set-cookie"))
        .flat_map(|header| header.value.split('\n').map(split_segments))
        .filter(|parts| !parts.is_empty())
        .map(Cookie::RawAttributes)
        .collect()
}

fn form_decode(input: &str) -> String {
    percent_decode_str(&input.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

fn query_from_url(url: &str) -> Vec<NameValue> {
    let Some((_, query)) = url.split_once('?') else {
        return Vec::new();
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut parts = segment.splitn(2, '=');
            let name = form_decode(parts.next().unwrap_or_default());
            let value = form_decode(parts.next().unwrap_or_default());
            NameValue { name, value }
        })
        .collect()
}

/// Base64 payloads are often wrapped at 76 columns; line breaks and other
/// whitespace are not part of the encoding.
fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

fn inflate_saml_request(value: &str) -> anyhow::Result<String> {
    let unescaped = percent_decode_str(value.trim())
        .decode_utf8()
        .context("percent-decoding SAMLRequest")?;
    let compressed = general_purpose::STANDARD
        .decode(strip_whitespace(&unescaped))
        .context("base64-decoding SAMLRequest")?;
    let mut xml = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_string(&mut xml)
        .context("inflating SAMLRequest")?;
    Ok(xml)
}

fn decode_saml_response(encoded: &str) -> anyhow::Result<String> {
    let unescaped = percent_decode_str(encoded.trim())
        .decode_utf8()
        .context("percent-decoding SAMLResponse")?;
    let decoded = general_purpose::STANDARD
        .decode(strip_whitespace(&unescaped))
        .context("base64-decoding SAMLResponse")?;
    String::from_utf8(decoded).context("SAMLResponse is not UTF-8")
}

/// Decode a redirect-binding `SAMLRequest` query parameter. Empty when the
/// parameter is absent or cannot be decoded.
pub fn saml_request_from_params(params: &[NameValue]) -> String {
    let Some(param) = params
        .iter()
        .find(|param| param.name.eq_ignore_ascii_case("samlrequest"))
    else {
        return String::new();
    };
    inflate_saml_request(&param.value).unwrap_or_else(|err| {
        tracing::debug!("Ignoring undecodable SAMLRequest: {err:#}");
        String::new()
    })
}

/// Decode a POST-binding `SAMLResponse` out of a form body. Empty when the
/// body has no `SAMLResponse=...&RelayState` pair or it cannot be decoded.
pub fn saml_response_from_body(body: &str) -> String {
    let Some(caps) = SAML_RESPONSE.captures(body) else {
        return String::new();
    };
    decode_saml_response(&caps[1]).unwrap_or_else(|err| {
        tracing::debug!("Ignoring undecodable SAMLResponse: {err:#}");
        String::new()
    })
}

// ---------------------------------------------------------------------------
// Entry normalization
// ---------------------------------------------------------------------------

fn normalize_request(raw: &Value) -> Request {
    let url = str_or(raw, "url", "");
    let headers = name_values(list(raw, "headers"));

    let mut cookies = structured_cookies(list(raw, "cookies"));
    if cookies.is_empty() {
        cookies = cookies_from_request_headers(&headers);
    }

    let mut query_params = name_values(list(raw, "queryString"));
    if query_params.is_empty() {
        query_params = query_from_url(&url);
    }

    let post = field(raw, "postData");
    let post_data = PostData {
        mime_type: str_or(post, "mimeType", ""),
        text: str_or(post, "text", ""),
        params: name_values(list(post, "params")),
    };

    Request {
        method: str_or(raw, "method", ""),
        protocol: extract_protocol(&url),
        url,
        http_version: str_or(raw, "httpVersion", ""),
        headers,
        cookies,
        query_params,
        post_data,
        headers_size: int_or(raw, "headersSize", UNKNOWN_NUMBER),
        body_size: int_or(raw, "bodySize", UNKNOWN_NUMBER),
    }
}

fn normalize_response(raw: &Value) -> Response {
    let headers = name_values(list(raw, "headers"));

    let mut cookies = structured_cookies(list(raw, "cookies"));
    if cookies.is_empty() {
        cookies = cookies_from_response_headers(&headers);
    }

    let content = field(raw, "content");
    Response {
        status: int_or(raw, "status", UNKNOWN_NUMBER),
        status_text: str_or(raw, "statusText", ""),
        http_version: str_or(raw, "httpVersion", ""),
        headers,
        cookies,
        content: Content {
            mime_type: str_or(content, "mimeType", ""),
            text: str_or(content, "text", ""),
            size: int_or(content, "size", UNKNOWN_NUMBER),
            encoding: str_or(content, "encoding", ""),
            compression: int_or(content, "compression", UNKNOWN_NUMBER),
        },
        redirect_url: str_or(raw, "redirectURL", ""),
        headers_size: int_or(raw, "headersSize", UNKNOWN_NUMBER),
        body_size: int_or(raw, "bodySize", UNKNOWN_NUMBER),
    }
}

fn normalize_timings(raw: &Value) -> Timings {
    Timings {
        blocked: float_or(raw, "blocked", UNKNOWN_TIMING),
        dns: float_or(raw, "dns", UNKNOWN_TIMING),
        connect: float_or(raw, "connect", UNKNOWN_TIMING),
        send: float_or(raw, "send", UNKNOWN_TIMING),
        wait: float_or(raw, "wait", UNKNOWN_TIMING),
        receive: float_or(raw, "receive", UNKNOWN_TIMING),
        ssl: float_or(raw, "ssl", UNKNOWN_TIMING),
    }
}

/// Convert one raw HAR entry into a canonical [`Entry`]. Total over any input:
/// even a non-object entry yields an entry full of sentinels.
pub fn normalize_entry(raw: &Value, config: &ViewerConfig) -> Entry {
    let request = normalize_request(field(raw, "request"));
    let response = normalize_response(field(raw, "response"));

    let (saml_request, saml_response) = if config.experimental_saml {
        (
            saml_request_from_params(&request.query_params),
            saml_response_from_body(&request.post_data.text),
        )
    } else {
        (String::new(), String::new())
    };

    Entry {
        id: uuid::Uuid::new_v4().to_string(),
        started_at: str_or(raw, "startedDateTime", ""),
        total_time: float_or(raw, "time", UNKNOWN_TIMING),
        server_ip: str_or(raw, "serverIPAddress", ""),
        connection_id: str_or(raw, "connection", ""),
        request,
        response,
        timings: normalize_timings(field(raw, "timings")),
        saml_request,
        saml_response,
    }
}

fn summarize(raw: &Value, entry_count: usize) -> LogSummary {
    let log = field(raw, "log");
    let creator = field(log, "creator");
    let browser = field(log, "browser");
    LogSummary {
        version: str_or(log, "version", UNKNOWN_LOG_FIELD),
        creator_name: str_or(creator, "name", UNKNOWN_LOG_FIELD),
        creator_version: str_or(creator, "version", UNKNOWN_LOG_FIELD),
        browser_name: str_or(browser, "name", UNKNOWN_LOG_FIELD),
        browser_version: str_or(browser, "version", UNKNOWN_LOG_FIELD),
        entry_count,
    }
}

fn raw_entries(raw: &Value) -> Result<&[Value], ImportError> {
    match field(field(raw, "log"), "entries") {
        Value::Array(items) if !items.is_empty() => Ok(items.as_slice()),
        _ => Err(ImportError::EmptyLog),
    }
}

fn should_report(processed: usize, total: usize) -> bool {
    processed % PROGRESS_INTERVAL == 0 || processed == total
}

/// Normalize a parsed HAR document into an [`EntryStore`].
pub fn normalize(
    raw: &Value,
    config: &ViewerConfig,
    progress: &mut impl ImportProgress,
) -> Result<EntryStore, ImportError> {
    let items = raw_entries(raw)?;
    let total = items.len();
    let mut entries = Vec::with_capacity(total);
    for (index, item) in items.iter().enumerate() {
        entries.push(normalize_entry(item, config));
        if should_report(index + 1, total) {
            progress.on_progress(index + 1, total);
        }
    }
    Ok(EntryStore::new(summarize(raw, total), entries))
}

/// Same as [`normalize`], yielding to the runtime after every progress report.
pub async fn normalize_async(
    raw: &Value,
    config: &ViewerConfig,
    progress: &mut impl ImportProgress,
) -> Result<EntryStore, ImportError> {
    let items = raw_entries(raw)?;
    let total = items.len();
    let mut entries = Vec::with_capacity(total);
    for (index, item) in items.iter().enumerate() {
        entries.push(normalize_entry(item, config));
        if should_report(index + 1, total) {
            progress.on_progress(index + 1, total);
            tokio::task::yield_now().await;
        }
    }
    Ok(EntryStore::new(summarize(raw, total), entries))
}

fn decode_text(bytes: &[u8]) -> Result<&str, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(std::str::from_utf8(bytes)?)
}

fn log_import(store: &EntryStore, started: Instant) {
    tracing::info!(
        "[OK] Imported {} entries in {:.1} seconds",
        store.len(),
        started.elapsed().as_secs_f64()
    );
}

pub fn import_har_from_str_with_progress(
    contents: &str,
    config: &ViewerConfig,
    progress: &mut impl ImportProgress,
) -> Result<EntryStore, ImportError> {
    let started = Instant::now();
    let value: Value = serde_json::from_str(contents.trim_start_matches('\u{feff}'))?;
    let store = normalize(&value, config, progress)?;
    log_import(&store, started);
    Ok(store)
}

pub fn import_har_from_str(
    contents: &str,
    config: &ViewerConfig,
) -> Result<EntryStore, ImportError> {
    import_har_from_str_with_progress(contents, config, &mut NoProgress)
}

/// Import from raw file bytes. A leading UTF-8 byte order mark is accepted.
pub fn import_har_from_slice(
    bytes: &[u8],
    config: &ViewerConfig,
) -> Result<EntryStore, ImportError> {
    import_har_from_str(decode_text(bytes)?, config)
}

pub fn import_har_from_path(
    path: impl AsRef<Path>,
    config: &ViewerConfig,
) -> Result<EntryStore, ImportError> {
    let data = std::fs::read(path)?;
    import_har_from_slice(&data, config)
}

pub async fn import_har_from_path_async(
    path: impl AsRef<Path>,
    config: &ViewerConfig,
    progress: &mut impl ImportProgress,
) -> Result<EntryStore, ImportError> {
    let started = Instant::now();
    let data = tokio::fs::read(path).await?;
    let value: Value = serde_json::from_str(decode_text(&data)?)?;
    let store = normalize_async(&value, config, progress).await?;
    log_import(&store, started);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use serde_json::json;
    use std::io::Write;

    fn single(entry: Value) -> Value {
        json!({ "log": { "version": "1.2", "entries": [entry] } })
    }

    fn normalize_one(entry: Value, config: &ViewerConfig) -> Entry {
        let store = normalize(&single(entry), config, &mut NoProgress).expect("normalizes");
        let entry = store.iter().next().cloned().expect("one entry");
        entry
    }

    fn deflate_base64(xml: &str) -> String {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(xml.as_bytes()).expect("compress");
        general_purpose::STANDARD.encode(encoder.finish().expect("finish"))
    }

    #[test]
    fn empty_object_entry_gets_every_sentinel() {
        let entry = normalize_one(json!({}), &ViewerConfig::default());
        assert_eq!(entry, Entry::new(entry.id.clone()));
    }

    #[test]
    fn nulls_and_wrong_types_resolve_to_defaults() {
        let entry = normalize_one(
            json!({
                "startedDateTime": null,
                "time": "fast",
                "serverIPAddress": 42,
                "connection": null,
                "request": {
                    "method": null,
                    "url": ["not", "a", "string"],
                    "headers": [null, 3, {"name": "Host"}],
                    "cookies": null,
                    "postData": "oops",
                    "bodySize": null
                },
                "response": {
                    "status": "200",
                    "content": null,
                    "headers": {"name": "x"},
                    "bodySize": 12.7
                },
                "timings": { "dns": null, "wait": "3.5", "ssl": true }
            }),
            &ViewerConfig::default(),
        );
        assert_eq!(entry.started_at, "");
        assert_eq!(entry.total_time, -1.0);
        assert_eq!(entry.server_ip, "42");
        assert_eq!(entry.connection_id, "");
        assert_eq!(entry.request.method, "");
        assert_eq!(entry.request.url, "");
        assert_eq!(entry.request.protocol, UNKNOWN_PROTOCOL);
        assert_eq!(entry.request.headers, vec![NameValue::new("Host", "")]);
        assert!(entry.request.cookies.is_empty());
        assert_eq!(entry.request.post_data, PostData::default());
        assert_eq!(entry.request.body_size, -1);
        assert_eq!(entry.response.status, 200);
        assert_eq!(entry.response.content, Content::default());
        assert!(entry.response.headers.is_empty());
        assert_eq!(entry.response.body_size, 12);
        assert_eq!(entry.timings.dns, -1.0);
        assert_eq!(entry.timings.wait, 3.5);
        assert_eq!(entry.timings.ssl, -1.0);
    }

    #[test]
    fn non_object_entry_is_absorbed() {
        let value = json!({ "log": { "entries": [null, "junk", 7] } });
        let store = normalize(&value, &ViewerConfig::default(), &mut NoProgress).expect("ok");
        assert_eq!(store.len(), 3);
        assert!(store.iter().all(|e| e.response.status == -1));
    }

    #[test]
    fn missing_or_empty_entries_fail() {
        for value in [
            json!({}),
            json!({ "log": {} }),
            json!({ "log": { "entries": [] } }),
            json!({ "log": { "entries": {} } }),
        ] {
            assert!(matches!(
                normalize(&value, &ViewerConfig::default(), &mut NoProgress),
                Err(ImportError::EmptyLog)
            ));
        }
    }

    #[test]
    fn protocol_accepts_any_scheme() {
        for (url, scheme) in [
            ("http://a", "http"),
            ("HTTPS://a/b", "https"),
            ("ws://a", "ws"),
            ("wss://a", "wss"),
            ("ftp://files", "ftp"),
        ] {
            assert_eq!(extract_protocol(url), scheme);
        }
        assert_eq!(extract_protocol("example.com/path"), UNKNOWN_PROTOCOL);
        assert_eq!(extract_protocol("data:text/plain,hi"), UNKNOWN_PROTOCOL);
        assert_eq!(extract_protocol(""), UNKNOWN_PROTOCOL);
    }

    #[test]
    fn request_cookies_rebuilt_from_header() {
        let entry = normalize_one(
            json!({ "request": {
                "cookies": [],
                "headers": [{ "name": "Cookie", "value": "a=1; b=2" }]
            }}),
            &ViewerConfig::default(),
        );
        assert_eq!(
            entry.request.cookies,
            vec![Cookie::Raw("a=1".into()), Cookie::Raw("b=2".into())]
        );
    }

    #[test]
    fn folded_set_cookie_yields_groups() {
        let entry = normalize_one(
            json!({ "response": {
                "headers": [{ "name": "set-cookie", "value": "x=1; Path=/\ny=2; Path=/" }]
            }}),
            &ViewerConfig::default(),
        );
        assert_eq!(
            entry.response.cookies,
            vec![
                Cookie::RawAttributes(vec!["x=1".into(), "Path=/".into()]),
                Cookie::RawAttributes(vec!["y=2".into(), "Path=/".into()]),
            ]
        );
    }

    #[test]
    fn structured_cookies_win_over_headers() {
        let entry = normalize_one(
            json!({ "request": {
                "cookies": [{ "name": "sid", "value": "9", "httpOnly": true, "path": "/" }],
                "headers": [{ "name": "Cookie", "value": "other=1" }]
            }}),
            &ViewerConfig::default(),
        );
        assert_eq!(
            entry.request.cookies,
            vec![Cookie::Structured {
                name: "sid".into(),
                value: "9".into(),
                attributes: vec![NameValue::new("httpOnly", "true"), NameValue::new("path", "/")],
            }]
        );
    }

    #[test]
    fn query_params_fall_back_to_url() {
        let entry = normalize_one(
            json!({ "request": { "url": "https://h/p?q=a+b&x=%2F#frag" } }),
            &ViewerConfig::default(),
        );
        assert_eq!(
            entry.request.query_params,
            vec![NameValue::new("q", "a b"), NameValue::new("x", "/")]
        );
    }

    #[test]
    fn saml_request_is_inflated_when_enabled() {
        let xml = "<samlp:AuthnRequest ID=\"1\"/>";
        let raw = json!({ "request": {
            "url": "https://idp/sso",
            "queryString": [{ "name": "samlrequest", "value": deflate_base64(xml) }]
        }});
        let enabled = ViewerConfig {
            experimental_saml: true,
            ..ViewerConfig::default()
        };
        assert_eq!(normalize_one(raw.clone(), &enabled).saml_request, xml);
        assert_eq!(normalize_one(raw, &ViewerConfig::default()).saml_request, "");
    }

    #[test]
    fn saml_response_needs_relay_state() {
        let xml = "<samlp:Response/>";
        let encoded = general_purpose::STANDARD
            .encode(xml)
            .replace('+', "%2B")
            .replace('=', "%3D");
        assert_eq!(
            saml_response_from_body(&format!("SAMLResponse={encoded}&RelayState=abc")),
            xml
        );
        assert_eq!(saml_response_from_body(&format!("SAMLResponse={encoded}")), "");
    }

    #[test]
    fn broken_saml_decodes_to_empty() {
        let params = vec![NameValue::new("SAMLRequest", "%%%not base64")];
        assert_eq!(saml_request_from_params(&params), "");
        assert_eq!(saml_response_from_body("SAMLResponse=!!!&RelayState=x"), "");
    }

    #[test]
    fn line_wrapped_saml_payloads_decode() {
        let xml = "<samlp:Response xmlns:samlp=\"urn:oasis:names:tc:SAML:2.0:protocol\" ID=\"_r1\"/>";
        let encoded = general_purpose::STANDARD.encode(xml);
        let (head, tail) = encoded.split_at(40);
        let body = format!(
            "SAMLResponse={}%0D%0A{}&RelayState=x",
            head,
            tail.replace('+', "%2B").replace('=', "%3D")
        );
        assert_eq!(saml_response_from_body(&body), xml);

        let request_xml = "<samlp:AuthnRequest ID=\"wrapped\"/>";
        let deflated = deflate_base64(request_xml);
        let (head, tail) = deflated.split_at(deflated.len() / 2);
        let params = vec![NameValue::new("SAMLRequest", format!("{head}\r\n{tail}"))];
        assert_eq!(saml_request_from_params(&params), request_xml);
    }

    #[test]
    fn ids_are_unique() {
        let value = json!({ "log": { "entries": [{}, {}, {}, {}] } });
        let store = normalize(&value, &ViewerConfig::default(), &mut NoProgress).expect("ok");
        let ids: std::collections::HashSet<_> = store.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn progress_reported_per_interval_and_at_end() {
        let entries: Vec<Value> = (0..PROGRESS_INTERVAL + 10).map(|_| json!({})).collect();
        let value = json!({ "log": { "entries": entries } });
        let mut reports = Vec::new();
        let mut sink = |done: usize, total: usize| reports.push((done, total));
        normalize(&value, &ViewerConfig::default(), &mut sink).expect("ok");
        let total = PROGRESS_INTERVAL + 10;
        assert_eq!(reports, vec![(PROGRESS_INTERVAL, total), (total, total)]);
    }

    #[test]
    fn summary_defaults_to_unknown() {
        let value = json!({ "log": { "creator": { "name": "Firefox" }, "entries": [{}] } });
        let store = normalize(&value, &ViewerConfig::default(), &mut NoProgress).expect("ok");
        let summary = store.summary();
        assert_eq!(summary.creator_name, "Firefox");
        assert_eq!(summary.creator_version, "Unknown");
        assert_eq!(summary.version, "Unknown");
        assert_eq!(summary.entry_count, 1);
    }

    #[test]
    fn slice_import_strips_bom_and_rejects_bad_utf8() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(br#"{"log":{"entries":[{}]}}"#);
        assert_eq!(
            import_har_from_slice(&bytes, &ViewerConfig::default())
                .expect("imports")
                .len(),
            1
        );
        assert!(matches!(
            import_har_from_slice(&[0xff, 0xfe, 0x00], &ViewerConfig::default()),
            Err(ImportError::Encoding(_))
        ));
    }

    #[test]
    fn invalid_json_is_a_syntax_error() {
        assert!(matches!(
            import_har_from_str("{ not json", &ViewerConfig::default()),
            Err(ImportError::Syntax(_))
        ));
    }
}
