//! Label normalization.
//!
//! Converts a raw corpus label into a canonical token sequence: lowercase,
//! `-` and space unified to `_`, split on `_`. Order is preserved — the
//! first and last tokens play distinct prefix/suffix roles downstream.

use smallvec::SmallVec;

/// Token storage; labels rarely exceed a handful of tokens.
pub type TokenVec = SmallVec<[String; 6]>;

/// A label in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLabel {
    /// Full lowercased form with separators unified to `_`. Doubled
    /// separators survive here; the similarity fallback compares this form.
    pub text: String,
    /// Ordered tokens. Empty tokens from doubled or leading/trailing
    /// separators are dropped, so prefix/suffix extraction never sees them.
    pub tokens: TokenVec,
}

impl NormalizedLabel {
    /// First token (prefix role). `None` for an empty label.
    pub fn prefix(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Last token (suffix role). Equals the prefix for single-token labels.
    pub fn suffix(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Tokens between prefix and suffix. Sequences of two or fewer tokens
    /// fall back to the full sequence.
    pub fn middle(&self) -> &[String] {
        if self.tokens.len() > 2 {
            &self.tokens[1..self.tokens.len() - 1]
        } else {
            &self.tokens
        }
    }
}

/// Normalize a raw label. Pure; defined for any input including the empty
/// string (which yields an empty token sequence).
pub fn normalize(label: &str) -> NormalizedLabel {
    let text: String = label
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();
    let tokens: TokenVec = text
        .split('_')
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();
    NormalizedLabel { text, tokens }
}
