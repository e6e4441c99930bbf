//! Viewer configuration snapshot
//!
//! The host owns configuration storage. The core only reads an immutable
//! [`ViewerConfig`] that is handed to each import or search call.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::highlight::Rgb;

/// Configuration consumed by the normalizer, renderers and search engines.
///
/// Key names follow the viewer's settings file, so an existing settings
/// document can be deserialized directly. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    #[serde(rename = "case-sensitive-matching")]
    pub case_sensitive_matching: bool,
    #[serde(rename = "cell-colorization")]
    pub cell_colorization: bool,
    #[serde(rename = "colour_scheme")]
    pub colour_scheme: ColorScheme,
    #[serde(rename = "experimental-saml")]
    pub experimental_saml: bool,
    /// Presentation only: header order inside the headers panels.
    #[serde(rename = "sort-headers")]
    pub sort_headers: bool,
    /// Presentation only: body panels are cut after this many characters.
    #[serde(rename = "truncate-character-count")]
    pub truncate_character_count: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            case_sensitive_matching: false,
            cell_colorization: true,
            colour_scheme: ColorScheme::default(),
            experimental_saml: false,
            sort_headers: false,
            truncate_character_count: 5000,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(contents: &str) -> anyhow::Result<Self> {
        serde_json::from_str(contents).context("parsing viewer configuration")
    }

    /// Load a configuration file. Unknown keys are ignored.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {:?}", path))?;
        Self::from_json_str(&data)
    }
}

/// Hex colors used by the entries table and the detail panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub default: String,
    pub search_match: String,
    /// Keyed by lowercase method name.
    pub method: BTreeMap<String, String>,
    /// Keyed by lowercase protocol name.
    pub protocol: BTreeMap<String, String>,
    /// Keyed by status class ("100", "200", ...).
    pub status: BTreeMap<String, String>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        }

        Self {
            default: "#ffffff".to_string(),
            search_match: "#ffff99".to_string(),
            method: table(&[
                ("connect", "#8dd3c7"),
                ("delete", "#fb8072"),
                ("get", "#ffffff"),
                ("head", "#ccebc5"),
                ("options", "#ffed6f"),
                ("patch", "#d9d9d9"),
                ("post", "#80b1d3"),
                ("put", "#fdb462"),
                ("trace", "#fccde5"),
            ]),
            protocol: table(&[
                ("http", "#fdb462"),
                ("https", "#ffffff"),
                ("wss", "#ccebc5"),
                ("ws", "#fdb462"),
                ("ftp", "#80b1d3"),
            ]),
            status: table(&[
                ("100", "#8dd3c7"),
                ("200", "#ffffff"),
                ("300", "#80b1d3"),
                ("400", "#fdb462"),
                ("500", "#fb8072"),
            ]),
        }
    }
}

impl ColorScheme {
    /// Background for cells and spans with no highlight. Falls back to white
    /// when the configured value is not a valid hex color.
    pub fn default_color(&self) -> Rgb {
        Rgb::from_hex(&self.default).unwrap_or(Rgb::WHITE)
    }

    pub fn search_match_color(&self) -> Rgb {
        Rgb::from_hex(&self.search_match).unwrap_or(Rgb::new(0xff, 0xff, 0x99))
    }

    pub fn method_color(&self, method: &str) -> Option<Rgb> {
        lookup(&self.method, &method.to_ascii_lowercase())
    }

    pub fn protocol_color(&self, protocol: &str) -> Option<Rgb> {
        lookup(&self.protocol, &protocol.to_ascii_lowercase())
    }

    /// Color for the class of `status` (403 uses the "400" entry).
    pub fn status_color(&self, status: i64) -> Option<Rgb> {
        if !(100..=599).contains(&status) {
            return None;
        }
        let class = (status / 100) * 100;
        lookup(&self.status, &class.to_string())
    }
}

fn lookup(table: &BTreeMap<String, String>, key: &str) -> Option<Rgb> {
    table.get(key).and_then(|hex| Rgb::from_hex(hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config =
            ViewerConfig::from_json_str(r#"{"experimental-saml": true, "sort-headers": true}"#)
                .expect("config parses");
        assert!(config.experimental_saml);
        assert!(config.sort_headers);
        assert!(!config.case_sensitive_matching);
        assert_eq!(config.truncate_character_count, 5000);
        assert_eq!(config.colour_scheme, ColorScheme::default());
    }

    #[test]
    fn status_classes_resolve_by_floor() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.status_color(403), Rgb::from_hex("#fdb462"));
        assert_eq!(scheme.status_color(599), Rgb::from_hex("#fb8072"));
        assert_eq!(scheme.status_color(-1), None);
        assert_eq!(scheme.status_color(0), None);
    }

    #[test]
    fn method_lookup_ignores_case() {
        let scheme = ColorScheme::default();
        assert_eq!(scheme.method_color("POST"), Rgb::from_hex("#80b1d3"));
        assert_eq!(scheme.method_color("PROPFIND"), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ViewerConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("reading configuration"));
    }
}
