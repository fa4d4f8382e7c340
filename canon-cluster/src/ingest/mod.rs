//! Lenient ingestion of the `(label, frequency)` input list.
//!
//! The input is a JSON array of `[label, frequency]` pairs. Malformed
//! individual records are skipped with a warning and the run continues;
//! only a structurally wrong document is an error.

use std::path::Path;

use canon_core::errors::IngestError;
use canon_core::types::collections::FxHashMap;
use canon_core::LabelCount;
use serde_json::Value;
use tracing::warn;

/// Parsed records plus per-kind counts of what did not survive as-is.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub records: Vec<LabelCount>,
    /// Malformed records dropped entirely.
    pub skipped: usize,
    /// Repeated labels whose earlier occurrence was superseded.
    pub duplicates: usize,
}

/// Parse the serialized array-of-pairs input format.
///
/// Skips (with a warning) any entry that is not a two-element array of a
/// string and a non-negative integer. Duplicate labels keep the last
/// occurrence and are warned about.
pub fn parse_label_counts(json: &str) -> Result<IngestOutcome, IngestError> {
    let value: Value = serde_json::from_str(json)?;
    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(IngestError::InvalidFormat {
                found: value_kind(&other),
            })
        }
    };

    let mut outcome = IngestOutcome::default();
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();

    for (index, entry) in entries.into_iter().enumerate() {
        match decode_pair(&entry) {
            Some((label, frequency)) => {
                if let Some(&existing) = seen.get(&label) {
                    warn!(index, label, "duplicate label; keeping the later record");
                    outcome.records[existing].frequency = frequency;
                    outcome.duplicates += 1;
                } else {
                    seen.insert(label.clone(), outcome.records.len());
                    outcome.records.push(LabelCount::new(label, frequency));
                }
            }
            None => {
                warn!(index, "skipping malformed input record");
                outcome.skipped += 1;
            }
        }
    }

    Ok(outcome)
}

/// Read and parse an input file.
pub fn read_label_counts(path: impl AsRef<Path>) -> Result<IngestOutcome, IngestError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_label_counts(&raw)
}

fn decode_pair(entry: &Value) -> Option<(String, u64)> {
    let pair = entry.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let label = pair[0].as_str()?;
    let frequency = pair[1].as_u64()?;
    Some((label.to_owned(), frequency))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
