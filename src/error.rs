//! Import error taxonomy
//!
//! Only file-level failures surface here. Field-level anomalies inside a HAR
//! entry are absorbed by the normalizer and never become errors.

use thiserror::Error;

/// Terminal failure of a HAR import. No partial store is produced.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("reading HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("HAR file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Failed to parse HAR JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("HAR file contains no entries")]
    EmptyLog,
}

impl ImportError {
    /// Message suitable for a status bar.
    pub fn user_message(&self) -> String {
        match self {
            ImportError::Io(_) | ImportError::Encoding(_) => {
                "[ERROR] Unable to import the selected file, please open a valid HAR file."
                    .to_string()
            }
            ImportError::Syntax(_) => "[ERROR] Unable to import the selected file due to invalid \
                 encoding. Please check the HAR file for errors."
                .to_string(),
            ImportError::EmptyLog => "[ERROR] HAR file contains no entries.".to_string(),
        }
    }
}
