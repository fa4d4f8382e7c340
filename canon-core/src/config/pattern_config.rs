//! Serde mirror of the pattern-similarity configuration file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Nested `category_type -> category -> [tokens...]` declaration, one per
/// token role.
pub type CategoryDeclarations = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// High-frequency anchor tokens with their corpus-wide frequencies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighFrequencyPatterns {
    pub prefixes: BTreeMap<String, u64>,
    pub suffixes: BTreeMap<String, u64>,
}

/// On-disk shape of the pattern-similarity configuration.
///
/// ```json
/// {
///   "prefix_patterns": { "modality": { "visual": ["image", "rgb"] } },
///   "suffix_patterns": { "content": { "visual": ["image", "video"] } },
///   "high_frequency_patterns": { "prefixes": { "rgb": 412 }, "suffixes": {} }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub prefix_patterns: CategoryDeclarations,
    pub suffix_patterns: CategoryDeclarations,
    pub high_frequency_patterns: HighFrequencyPatterns,
}

impl PatternConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
