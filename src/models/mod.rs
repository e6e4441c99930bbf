//! Data models for harlens
//!
//! These models are shared by the normalizer, the search engines and the
//! presentation layer.

pub mod entry;

pub use entry::*;
