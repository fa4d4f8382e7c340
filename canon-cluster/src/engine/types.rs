//! Types for the clustering engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule tier that produced a cluster, in evaluation priority order.
///
/// Recorded from the rule that admitted the cluster's second member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    PrefixExact,
    PrefixCategory,
    SuffixExact,
    SuffixCategory,
    Similarity,
}

impl MatchKind {
    pub const ALL: [MatchKind; 5] = [
        MatchKind::PrefixExact,
        MatchKind::PrefixCategory,
        MatchKind::SuffixExact,
        MatchKind::SuffixCategory,
        MatchKind::Similarity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrefixExact => "prefix_exact",
            Self::PrefixCategory => "prefix_category",
            Self::SuffixExact => "suffix_exact",
            Self::SuffixCategory => "suffix_category",
            Self::Similarity => "similarity",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One label inside a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    /// Raw label as it appeared in the corpus.
    pub name: String,
    /// Occurrence frequency of that label.
    pub frequency: u64,
}

/// A group of labels judged semantically equivalent.
///
/// Always has at least two members; singletons stay isolated and are never
/// emitted. The key is the highest-frequency member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// The key label (first, highest-frequency member).
    pub key: String,
    /// Sum of member frequencies.
    pub total_frequency: u64,
    /// Members in admission order — frequency descending by construction.
    pub members: Vec<ClusterMember>,
    /// Rule tier that formed this cluster.
    pub match_kind: MatchKind,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of one clustering run, ordered by total frequency descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSet {
    pub clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total number of labels placed into any cluster.
    pub fn clustered_labels(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Sum of frequencies over all clustered labels.
    pub fn clustered_frequency(&self) -> u64 {
        self.clusters.iter().map(|c| c.total_frequency).sum()
    }

    /// Serializable key-label → group mapping (the external interface).
    pub fn to_groups(&self) -> BTreeMap<String, ClusterGroup> {
        self.clusters
            .iter()
            .map(|c| {
                let mut types: Vec<TypeEntry> = c
                    .members
                    .iter()
                    .map(|m| TypeEntry {
                        name: m.name.clone(),
                        frequency: m.frequency,
                    })
                    .collect();
                types.sort_by(|a, b| b.frequency.cmp(&a.frequency));
                (
                    c.key.clone(),
                    ClusterGroup {
                        total_frequency: c.total_frequency,
                        types,
                    },
                )
            })
            .collect()
    }
}

/// Serialized form of one cluster: total frequency plus members sorted by
/// frequency descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub total_frequency: u64,
    pub types: Vec<TypeEntry>,
}

/// One member entry in the serialized cluster map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    pub frequency: u64,
}
