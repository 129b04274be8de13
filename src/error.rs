//! Error types for input decoding and report rendering.

use thiserror::Error;

/// Raised when the upstream metrics document cannot be turned into records.
#[derive(Debug, Error)]
pub enum InputError {
    /// The top-level value is not an ordered sequence of file records.
    #[error("expected a JSON array of file records, found {found}")]
    NotASequence { found: &'static str },

    /// A single element could not be decoded as a file record.
    #[error("file record #{index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The metrics document could not be read.
    #[error("failed to read metrics from {origin}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The metrics document is not valid JSON.
    #[error("failed to parse metrics from {origin}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raised while writing tables or the diagnostics document.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize diagnostics document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A result was recorded before `begin_document` was called.
    #[error("diagnostics document was not started")]
    DocumentNotStarted,
}
