//! Per-match-type accounting over a clustering run.
//!
//! All counters are explicit, zero-initialized nested structures — no
//! auto-vivifying defaults — so a key exists in the output only when a
//! cluster actually contributed to it.

use std::collections::{BTreeMap, BTreeSet};

use canon_core::config::{PatternTable, TokenRole};
use serde::{Deserialize, Serialize};

use crate::engine::{Cluster, ClusterGroup, ClusterSet, MatchKind};
use crate::normalize::normalize;

/// Headline counts for one clustering run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub total_groups: usize,
    pub total_types: usize,
    pub total_frequency: u64,
}

/// Accumulated stats for one category of a category-match tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatchStats {
    pub group_count: usize,
    pub type_count: usize,
    pub total_frequency: u64,
    /// Configured tokens that actually keyed a cluster in this category.
    pub matched_patterns: BTreeSet<String>,
    /// Configured tokens of this category that never keyed a cluster.
    pub unmatched_patterns: BTreeSet<String>,
}

/// Accumulated stats for the similarity fallback tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityMatchStats {
    pub group_count: usize,
    pub type_count: usize,
    pub total_frequency: u64,
}

/// Per-tier accounting. Each cluster is counted under exactly one tier —
/// the match kind recorded when it formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    /// Anchor token → summed frequency of clusters it keyed.
    pub prefix_exact: BTreeMap<String, u64>,
    pub prefix_category: BTreeMap<String, CategoryMatchStats>,
    pub suffix_exact: BTreeMap<String, u64>,
    pub suffix_category: BTreeMap<String, CategoryMatchStats>,
    pub similarity: SimilarityMatchStats,
}

impl MatchingStatistics {
    /// Total matched frequency attributed to one tier.
    pub fn frequency_for(&self, kind: MatchKind) -> u64 {
        match kind {
            MatchKind::PrefixExact => self.prefix_exact.values().sum(),
            MatchKind::PrefixCategory => self
                .prefix_category
                .values()
                .map(|s| s.total_frequency)
                .sum(),
            MatchKind::SuffixExact => self.suffix_exact.values().sum(),
            MatchKind::SuffixCategory => self
                .suffix_category
                .values()
                .map(|s| s.total_frequency)
                .sum(),
            MatchKind::Similarity => self.similarity.total_frequency,
        }
    }

    /// Matched frequency summed over all five tiers.
    pub fn total_matched_frequency(&self) -> u64 {
        MatchKind::ALL.iter().map(|&k| self.frequency_for(k)).sum()
    }
}

/// Overall plus per-tier statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    pub overall: OverallStatistics,
    pub matching: MatchingStatistics,
}

/// The full serializable output record: statistics plus the key-label →
/// group mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub statistics: AnalysisStatistics,
    pub groups: BTreeMap<String, ClusterGroup>,
}

/// Compute statistics over a clustering run.
pub fn build_statistics(set: &ClusterSet, table: &PatternTable) -> AnalysisStatistics {
    let mut matching = MatchingStatistics::default();

    for cluster in &set.clusters {
        record_cluster(&mut matching, cluster, table);
    }
    fill_unmatched(&mut matching.prefix_category, table, TokenRole::Prefix);
    fill_unmatched(&mut matching.suffix_category, table, TokenRole::Suffix);

    AnalysisStatistics {
        overall: OverallStatistics {
            total_groups: set.len(),
            total_types: set.clustered_labels(),
            total_frequency: set.clustered_frequency(),
        },
        matching,
    }
}

/// Assemble the external output record for a run.
pub fn build_results(set: &ClusterSet, table: &PatternTable) -> AnalysisResults {
    AnalysisResults {
        statistics: build_statistics(set, table),
        groups: set.to_groups(),
    }
}

fn record_cluster(matching: &mut MatchingStatistics, cluster: &Cluster, table: &PatternTable) {
    let key = normalize(&cluster.key);

    match cluster.match_kind {
        MatchKind::PrefixExact => {
            if let Some(prefix) = key.prefix() {
                *matching.prefix_exact.entry(prefix.to_owned()).or_default() +=
                    cluster.total_frequency;
            }
        }
        MatchKind::PrefixCategory => {
            if let Some(category) =
                key.prefix().and_then(|p| table.category(TokenRole::Prefix, p))
            {
                let stats = matching
                    .prefix_category
                    .entry(category.qualified())
                    .or_default();
                stats.group_count += 1;
                stats.type_count += cluster.len();
                stats.total_frequency += cluster.total_frequency;
                if let Some(prefix) = key.prefix() {
                    stats.matched_patterns.insert(prefix.to_owned());
                }
            }
        }
        MatchKind::SuffixExact => {
            if let Some(suffix) = key.suffix() {
                *matching.suffix_exact.entry(suffix.to_owned()).or_default() +=
                    cluster.total_frequency;
            }
        }
        MatchKind::SuffixCategory => {
            if let Some(category) =
                key.suffix().and_then(|s| table.category(TokenRole::Suffix, s))
            {
                let stats = matching
                    .suffix_category
                    .entry(category.qualified())
                    .or_default();
                stats.group_count += 1;
                stats.type_count += cluster.len();
                stats.total_frequency += cluster.total_frequency;
                if let Some(suffix) = key.suffix() {
                    stats.matched_patterns.insert(suffix.to_owned());
                }
            }
        }
        MatchKind::Similarity => {
            matching.similarity.group_count += 1;
            matching.similarity.type_count += cluster.len();
            matching.similarity.total_frequency += cluster.total_frequency;
        }
    }
}

/// Record, for every category that matched at all, which of its configured
/// tokens never keyed a cluster.
fn fill_unmatched(
    per_category: &mut BTreeMap<String, CategoryMatchStats>,
    table: &PatternTable,
    role: TokenRole,
) {
    for (category_key, stats) in per_category.iter_mut() {
        if let Some(configured) = table.category_tokens(role).get(category_key) {
            stats.unmatched_patterns = configured
                .difference(&stats.matched_patterns)
                .cloned()
                .collect();
        }
    }
}
