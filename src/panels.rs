//! Detail panel rendering
//!
//! Each selected entry is shown as a set of text panels (headers, params,
//! cookies, body, SAML) on the request side and the response side. The panel
//! search engine operates on exactly the text produced here.

use crate::config::ViewerConfig;
use crate::models::{Cookie, Entry, NameValue, UNKNOWN_NUMBER};

const TRUNCATION_MARKER: &str = "\n. . .";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Request,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    RequestHeaders,
    RequestParams,
    RequestCookies,
    RequestBody,
    RequestSaml,
    ResponseHeaders,
    ResponseCookies,
    ResponseBody,
    /// Shown for symmetry with the request side; SAML is only decoded from
    /// requests, so this panel is always empty and disabled.
    ResponseSaml,
}

impl PanelKind {
    pub const ALL: [PanelKind; 9] = [
        PanelKind::RequestHeaders,
        PanelKind::RequestParams,
        PanelKind::RequestCookies,
        PanelKind::RequestBody,
        PanelKind::RequestSaml,
        PanelKind::ResponseHeaders,
        PanelKind::ResponseCookies,
        PanelKind::ResponseBody,
        PanelKind::ResponseSaml,
    ];

    pub fn side(&self) -> Side {
        match self {
            PanelKind::RequestHeaders
            | PanelKind::RequestParams
            | PanelKind::RequestCookies
            | PanelKind::RequestBody
            | PanelKind::RequestSaml => Side::Request,
            PanelKind::ResponseHeaders
            | PanelKind::ResponseCookies
            | PanelKind::ResponseBody
            | PanelKind::ResponseSaml => Side::Response,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::RequestHeaders | PanelKind::ResponseHeaders => "Headers",
            PanelKind::RequestParams => "Params",
            PanelKind::RequestCookies | PanelKind::ResponseCookies => "Cookies",
            PanelKind::RequestBody | PanelKind::ResponseBody => "Body",
            PanelKind::RequestSaml | PanelKind::ResponseSaml => "SAML",
        }
    }

    /// Panels of one side in tab order
    pub fn of_side(side: Side) -> impl Iterator<Item = PanelKind> {
        PanelKind::ALL
            .into_iter()
            .filter(move |kind| kind.side() == side)
    }

    pub fn headers(side: Side) -> PanelKind {
        match side {
            Side::Request => PanelKind::RequestHeaders,
            Side::Response => PanelKind::ResponseHeaders,
        }
    }

    fn is_body(&self) -> bool {
        matches!(self, PanelKind::RequestBody | PanelKind::ResponseBody)
    }
}

/// Text of one panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedPanel {
    pub text: String,
    /// Body was cut at the configured character count
    pub truncated: bool,
}

impl RenderedPanel {
    fn plain(text: String) -> Self {
        Self {
            text,
            truncated: false,
        }
    }
}

/// Render a panel, truncating long bodies.
pub fn render_panel(entry: &Entry, kind: PanelKind, config: &ViewerConfig) -> RenderedPanel {
    if kind.is_body() {
        return truncate(render_text(entry, kind, config), config.truncate_character_count);
    }
    RenderedPanel::plain(render_text(entry, kind, config))
}

/// Render a panel without truncation (the "expand" action on a body).
pub fn render_panel_full(entry: &Entry, kind: PanelKind, config: &ViewerConfig) -> RenderedPanel {
    RenderedPanel::plain(render_text(entry, kind, config))
}

fn render_text(entry: &Entry, kind: PanelKind, config: &ViewerConfig) -> String {
    match kind {
        PanelKind::RequestHeaders => {
            let request = &entry.request;
            let summary = join_present(&[
                request.method.to_uppercase(),
                request.url.clone(),
                request.http_version.to_uppercase(),
            ]);
            headers_text(summary, &request.headers, config.sort_headers)
        }
        PanelKind::ResponseHeaders => {
            let response = &entry.response;
            let status = if response.status == UNKNOWN_NUMBER {
                String::new()
            } else {
                response.status.to_string()
            };
            let summary = join_present(&[
                response.http_version.to_uppercase(),
                status,
                response.status_text.clone(),
            ]);
            headers_text(summary, &response.headers, config.sort_headers)
        }
        PanelKind::RequestParams => entry
            .request
            .query_params
            .iter()
            .map(|param| {
                if param.value.is_empty() {
                    param.name.clone()
                } else {
                    format!("{}: {}", param.name, param.value)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        PanelKind::RequestCookies => cookies_text(&entry.request.cookies),
        PanelKind::ResponseCookies => cookies_text(&entry.response.cookies),
        PanelKind::RequestBody => {
            let post = &entry.request.post_data;
            if !post.text.is_empty() {
                post.text.clone()
            } else {
                pairs(&post.params)
            }
        }
        PanelKind::ResponseBody => entry.response.content.text.clone(),
        PanelKind::RequestSaml => {
            if entry.saml_request.is_empty() {
                entry.saml_response.clone()
            } else {
                entry.saml_request.clone()
            }
        }
        PanelKind::ResponseSaml => String::new(),
    }
}

fn join_present(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn pairs(items: &[NameValue]) -> String {
    items
        .iter()
        .map(|item| format!("{}: {}", item.name, item.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn headers_text(summary: String, headers: &[NameValue], sort: bool) -> String {
    let mut headers = headers.to_vec();
    if sort {
        headers.sort_by(|a, b| a.name.cmp(&b.name));
    }
    let body = pairs(&headers);
    match (summary.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => summary,
        (false, false) => format!("{}\n\n{}", summary, body),
    }
}

fn cookies_text(cookies: &[Cookie]) -> String {
    let mut lines = Vec::new();
    for cookie in cookies {
        match cookie {
            Cookie::Raw(raw) => lines.push(raw.clone()),
            Cookie::RawAttributes(parts) => lines.push(parts.join("; ")),
            Cookie::Structured {
                name,
                value,
                attributes,
            } => {
                lines.push(format!("name: {}", name));
                lines.push(format!("value: {}", value));
                lines.extend(
                    attributes
                        .iter()
                        .map(|attr| format!("{}: {}", attr.name, attr.value)),
                );
                lines.push(String::new());
            }
        }
    }
    lines.join("\n").trim_end_matches('\n').to_string()
}

/// A limit of zero disables truncation.
fn truncate(text: String, limit: usize) -> RenderedPanel {
    if limit == 0 {
        return RenderedPanel::plain(text);
    }
    match text.char_indices().nth(limit) {
        Some((cut, _)) => RenderedPanel {
            text: format!("{}{}", &text[..cut], TRUNCATION_MARKER),
            truncated: true,
        },
        None => RenderedPanel::plain(text),
    }
}
