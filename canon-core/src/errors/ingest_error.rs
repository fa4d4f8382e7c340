//! Ingestion errors.
//!
//! Only structural faults are errors: a malformed individual record is
//! skipped with a warning and the run continues.

/// Errors raised while reading the `(label, frequency)` input list.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse input: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Expected a top-level array of [label, frequency] pairs, found {found}")]
    InvalidFormat { found: &'static str },
}
