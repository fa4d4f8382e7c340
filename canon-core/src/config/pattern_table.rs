//! Compiled token lookup tables.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::pattern_config::{CategoryDeclarations, PatternConfig};
use super::HIGH_FREQUENCY_THRESHOLD;
use crate::errors::ConfigError;
use crate::types::collections::FxHashMap;

/// Role a token plays within a normalized label.
///
/// The first token of a label is its prefix, the last its suffix; a
/// single-token label plays both roles with the same token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRole {
    Prefix,
    Suffix,
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix => f.write_str("prefix"),
            Self::Suffix => f.write_str("suffix"),
        }
    }
}

/// A `(category_type, category)` pair a token maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryKey {
    pub category_type: String,
    pub category: String,
}

impl CategoryKey {
    pub fn new(category_type: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            category_type: category_type.into(),
            category: category.into(),
        }
    }

    /// Flat `category_type_category` form used as a reporting key.
    pub fn qualified(&self) -> String {
        format!("{}_{}", self.category_type, self.category)
    }
}

/// One role's compiled lookup state.
#[derive(Debug, Clone, Default)]
struct RoleTable {
    /// token -> category. Exactly one category per token; compilation fails
    /// on conflicting declarations.
    categories: FxHashMap<String, CategoryKey>,
    /// qualified category key -> every token declared under it. Retained for
    /// matched/unmatched pattern reporting.
    category_tokens: BTreeMap<String, BTreeSet<String>>,
    /// High-frequency anchor token -> corpus frequency.
    anchors: FxHashMap<String, u64>,
}

/// Static lookup structure consumed by the clustering engine.
///
/// Read-only for the engine's whole run. Built once from a [`PatternConfig`]
/// via [`PatternTable::compile`].
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    prefix: RoleTable,
    suffix: RoleTable,
}

impl PatternTable {
    /// Compile a configuration into lookup form, validating it on the way.
    ///
    /// Fails fast with [`ConfigError::ConflictingCategory`] when a token is
    /// declared under two different categories of the same role. Anchors
    /// missing from the role's category table and anchors below the
    /// high-frequency threshold are warned about but accepted: anchor
    /// membership is independent of the category table.
    pub fn compile(config: &PatternConfig) -> Result<Self, ConfigError> {
        let prefix = compile_role(
            TokenRole::Prefix,
            &config.prefix_patterns,
            &config.high_frequency_patterns.prefixes,
        )?;
        let suffix = compile_role(
            TokenRole::Suffix,
            &config.suffix_patterns,
            &config.high_frequency_patterns.suffixes,
        )?;
        Ok(Self { prefix, suffix })
    }

    fn role(&self, role: TokenRole) -> &RoleTable {
        match role {
            TokenRole::Prefix => &self.prefix,
            TokenRole::Suffix => &self.suffix,
        }
    }

    /// Category a token maps to within the given role, if any.
    pub fn category(&self, role: TokenRole, token: &str) -> Option<&CategoryKey> {
        self.role(role).categories.get(token)
    }

    /// Whether a token belongs to the role's high-frequency anchor set.
    pub fn is_anchor(&self, role: TokenRole, token: &str) -> bool {
        self.role(role).anchors.contains_key(token)
    }

    /// Corpus frequency recorded for an anchor token.
    pub fn anchor_frequency(&self, role: TokenRole, token: &str) -> Option<u64> {
        self.role(role).anchors.get(token).copied()
    }

    /// All tokens declared under each qualified category key of a role.
    pub fn category_tokens(&self, role: TokenRole) -> &BTreeMap<String, BTreeSet<String>> {
        &self.role(role).category_tokens
    }

    /// Number of distinct categorized tokens in a role.
    pub fn token_count(&self, role: TokenRole) -> usize {
        self.role(role).categories.len()
    }
}

fn compile_role(
    role: TokenRole,
    declarations: &CategoryDeclarations,
    anchors: &BTreeMap<String, u64>,
) -> Result<RoleTable, ConfigError> {
    let mut table = RoleTable::default();

    for (category_type, categories) in declarations {
        for (category, tokens) in categories {
            let key = CategoryKey::new(category_type.clone(), category.clone());
            for token in tokens {
                match table.categories.get(token) {
                    Some(existing) if *existing != key => {
                        return Err(ConfigError::ConflictingCategory {
                            role,
                            token: token.clone(),
                            existing: existing.qualified(),
                            conflicting: key.qualified(),
                        });
                    }
                    Some(_) => {
                        warn!(%role, token, "duplicate token declaration in category table");
                    }
                    None => {
                        table.categories.insert(token.clone(), key.clone());
                    }
                }
                table
                    .category_tokens
                    .entry(key.qualified())
                    .or_default()
                    .insert(token.clone());
            }
        }
    }

    for (token, frequency) in anchors {
        if *frequency < HIGH_FREQUENCY_THRESHOLD {
            warn!(
                %role,
                token,
                frequency,
                "anchor token below the high-frequency threshold"
            );
        }
        if !table.categories.contains_key(token) {
            warn!(%role, token, "anchor token has no category table entry");
        }
        table.anchors.insert(token.clone(), *frequency);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_json() -> &'static str {
        r#"{
            "prefix_patterns": {
                "modality": {
                    "visual": ["image", "rgb", "depth"],
                    "audio": ["speech", "audio"]
                }
            },
            "suffix_patterns": {
                "content": { "visual": ["image", "video"] },
                "data_format": { "mask": ["mask", "map"] }
            },
            "high_frequency_patterns": {
                "prefixes": { "rgb": 412 },
                "suffixes": { "image": 1930 }
            }
        }"#
    }

    #[test]
    fn test_compile_builds_role_tables() {
        let config = PatternConfig::from_json_str(config_json()).unwrap();
        let table = PatternTable::compile(&config).unwrap();

        let cat = table.category(TokenRole::Prefix, "rgb").unwrap();
        assert_eq!(cat, &CategoryKey::new("modality", "visual"));
        assert_eq!(
            table.category(TokenRole::Suffix, "map").unwrap().qualified(),
            "data_format_mask"
        );
        // Roles are independent: "rgb" is only categorized as a prefix.
        assert!(table.category(TokenRole::Suffix, "rgb").is_none());

        assert!(table.is_anchor(TokenRole::Prefix, "rgb"));
        assert!(!table.is_anchor(TokenRole::Prefix, "image"));
        assert_eq!(table.anchor_frequency(TokenRole::Suffix, "image"), Some(1930));
        assert_eq!(table.token_count(TokenRole::Prefix), 5);
    }

    #[test]
    fn test_conflicting_category_fails_fast() {
        let json = r#"{
            "prefix_patterns": {
                "modality": { "visual": ["rgb"], "audio": ["rgb"] }
            }
        }"#;
        let config = PatternConfig::from_json_str(json).unwrap();
        match PatternTable::compile(&config) {
            Err(ConfigError::ConflictingCategory { token, .. }) => assert_eq!(token, "rgb"),
            other => panic!("expected ConflictingCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_duplicate_declaration_is_tolerated() {
        // Same token declared twice under the *same* category: deduplicated.
        let json = r#"{
            "suffix_patterns": {
                "content": { "visual": ["image", "image"] }
            }
        }"#;
        let config = PatternConfig::from_json_str(json).unwrap();
        let table = PatternTable::compile(&config).unwrap();
        assert_eq!(table.token_count(TokenRole::Suffix), 1);
    }

    #[test]
    fn test_anchor_without_category_entry_is_accepted() {
        // The anchor set is independent of the category table.
        let json = r#"{
            "high_frequency_patterns": { "prefixes": { "rgb": 412 } }
        }"#;
        let config = PatternConfig::from_json_str(json).unwrap();
        let table = PatternTable::compile(&config).unwrap();
        assert!(table.is_anchor(TokenRole::Prefix, "rgb"));
        assert!(table.category(TokenRole::Prefix, "rgb").is_none());
    }

    #[test]
    fn test_category_tokens_index() {
        let config = PatternConfig::from_json_str(config_json()).unwrap();
        let table = PatternTable::compile(&config).unwrap();
        let index = table.category_tokens(TokenRole::Prefix);
        let visual = index.get("modality_visual").unwrap();
        assert!(visual.contains("image") && visual.contains("rgb") && visual.contains("depth"));
    }
}
