//! Shared types for the canonicalization pipeline.

pub mod collections;

use serde::{Deserialize, Serialize};

/// A distinct corpus label together with its occurrence frequency.
///
/// Labels are unique keys within one input set; the frequency is a
/// non-negative occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// The label exactly as it appears in the corpus.
    pub label: String,
    /// Number of occurrences across the corpus.
    pub frequency: u64,
}

impl LabelCount {
    pub fn new(label: impl Into<String>, frequency: u64) -> Self {
        Self {
            label: label.into(),
            frequency,
        }
    }
}
