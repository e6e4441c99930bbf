//! # harlens
//!
//! Normalization and search engine behind the harlens HAR viewer.
//!
//! ## Features
//!
//! - Total HAR import: every field a viewer reads exists, with sentinel defaults
//! - Cookie reconstruction from `Cookie` / `Set-Cookie` headers
//! - Optional SAML request/response decoding
//! - Global search over every entry with wrap-around navigation
//! - Per-panel search with highlight spans and idempotent clear
//! - Semantic cell colorization (method, protocol, status class)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Presentation layer (viewer / CLI)          │
//! ├─────────────────────────────────────────────────────────┤
//! │                      harlens (Rust)                      │
//! │  ┌──────────┐  ┌────────────┐  ┌────────┐  ┌─────────┐  │
//! │  │   HAR    │  │   Entry    │  │ Search │  │Highlight│  │
//! │  │Normalizer│──│   Store    │──│ engines│──│  state  │  │
//! │  └──────────┘  └────────────┘  └────────┘  └─────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod models;
pub mod panels;
pub mod search;
pub mod storage;
pub mod table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
