//! Greedy single-pass clustering engine.
//!
//! Labels are visited in frequency-descending order; each unclaimed label
//! opens a cluster and absorbs every later unclaimed label that matches it
//! under the priority-ordered rule set (prefix exact → prefix category →
//! suffix exact → suffix category → similarity fallback). One deterministic
//! pass, no backtracking — local clusters, not a global optimum.
//!
//! O(n²) pairwise comparisons in the worst case. Intentional at the target
//! scale (tens of thousands of distinct labels); revisit before feeding in
//! vocabularies orders of magnitude beyond that.

mod types;

pub use types::{Cluster, ClusterGroup, ClusterMember, ClusterSet, MatchKind, TypeEntry};

use canon_core::config::{PatternTable, TokenRole};
use canon_core::types::collections::FxHashSet;
use canon_core::LabelCount;
use tracing::debug;

use crate::normalize::{normalize, NormalizedLabel};
use crate::similarity::{ratio, DEFAULT_SIMILARITY_THRESHOLD};

/// Deterministic greedy clusterer over a read-only [`PatternTable`].
pub struct ClusterEngine<'a> {
    table: &'a PatternTable,
    threshold: f64,
}

impl<'a> ClusterEngine<'a> {
    pub fn new(table: &'a PatternTable, threshold: f64) -> Self {
        Self { table, threshold }
    }

    pub fn with_default_threshold(table: &'a PatternTable) -> Self {
        Self::new(table, DEFAULT_SIMILARITY_THRESHOLD)
    }

    /// Build clusters over the full label set.
    ///
    /// Visit order is frequency descending with a lexicographic tie-break on
    /// the label, so identical inputs always produce identical clusters
    /// regardless of input ordering. Labels that match no partner stay
    /// isolated and are not emitted. An empty input yields an empty set.
    pub fn build(&self, labels: &[LabelCount]) -> ClusterSet {
        let normalized: Vec<NormalizedLabel> =
            labels.iter().map(|l| normalize(&l.label)).collect();

        let mut order: Vec<usize> = (0..labels.len()).collect();
        order.sort_unstable_by(|&x, &y| {
            labels[y]
                .frequency
                .cmp(&labels[x].frequency)
                .then_with(|| labels[x].label.cmp(&labels[y].label))
        });

        // Claimed bit per arena index instead of a membership set.
        let mut claimed = vec![false; labels.len()];
        let mut clusters = Vec::new();

        for (pos, &key_idx) in order.iter().enumerate() {
            if claimed[key_idx] {
                continue;
            }
            claimed[key_idx] = true;

            let key = &labels[key_idx];
            let mut members = vec![ClusterMember {
                name: key.label.clone(),
                frequency: key.frequency,
            }];
            let mut total_frequency = key.frequency;
            let mut match_kind: Option<MatchKind> = None;

            for &cand_idx in &order[pos + 1..] {
                if claimed[cand_idx] {
                    continue;
                }
                if let Some(kind) = self.match_pair(&normalized[key_idx], &normalized[cand_idx])
                {
                    claimed[cand_idx] = true;
                    // The kind reported for the cluster is the rule that
                    // admitted its second member.
                    match_kind.get_or_insert(kind);
                    total_frequency += labels[cand_idx].frequency;
                    members.push(ClusterMember {
                        name: labels[cand_idx].label.clone(),
                        frequency: labels[cand_idx].frequency,
                    });
                }
            }

            if let Some(match_kind) = match_kind {
                clusters.push(Cluster {
                    key: key.label.clone(),
                    total_frequency,
                    members,
                    match_kind,
                });
            }
        }

        clusters.sort_by(|a, b| {
            b.total_frequency
                .cmp(&a.total_frequency)
                .then_with(|| a.key.cmp(&b.key))
        });

        debug!(
            labels = labels.len(),
            clusters = clusters.len(),
            "clustering pass complete"
        );
        ClusterSet { clusters }
    }

    /// Decide whether two normalized labels belong together.
    ///
    /// Rules are evaluated in priority order; the first satisfied rule wins.
    /// Both prefixes being anchors is not enough — they must be identical;
    /// unequal anchors still fall through to the category rules.
    fn match_pair(&self, a: &NormalizedLabel, b: &NormalizedLabel) -> Option<MatchKind> {
        if let (Some(p1), Some(p2)) = (a.prefix(), b.prefix()) {
            if p1 == p2
                && self.table.is_anchor(TokenRole::Prefix, p1)
                && self.table.is_anchor(TokenRole::Prefix, p2)
            {
                return Some(MatchKind::PrefixExact);
            }
            if let (Some(c1), Some(c2)) = (
                self.table.category(TokenRole::Prefix, p1),
                self.table.category(TokenRole::Prefix, p2),
            ) {
                if c1 == c2 {
                    return Some(MatchKind::PrefixCategory);
                }
            }
        }

        if let (Some(s1), Some(s2)) = (a.suffix(), b.suffix()) {
            if s1 == s2
                && self.table.is_anchor(TokenRole::Suffix, s1)
                && self.table.is_anchor(TokenRole::Suffix, s2)
            {
                return Some(MatchKind::SuffixExact);
            }
            if let (Some(c1), Some(c2)) = (
                self.table.category(TokenRole::Suffix, s1),
                self.table.category(TokenRole::Suffix, s2),
            ) {
                // A shared suffix category alone is weak evidence; require
                // the middle tokens to overlap as well.
                if c1 == c2 && middle_intersects(a, b) {
                    return Some(MatchKind::SuffixCategory);
                }
            }
        }

        if ratio(&a.text, &b.text) > self.threshold {
            return Some(MatchKind::Similarity);
        }

        None
    }
}

fn middle_intersects(a: &NormalizedLabel, b: &NormalizedLabel) -> bool {
    let left: FxHashSet<&str> = a.middle().iter().map(String::as_str).collect();
    b.middle().iter().any(|t| left.contains(t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use canon_core::config::PatternConfig;

    fn table() -> PatternTable {
        let json = r#"{
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
                "prefixes": { "rgb": 412, "audio": 230 },
                "suffixes": { "data": 2105 }
            }
        }"#;
        PatternTable::compile(&PatternConfig::from_json_str(json).unwrap()).unwrap()
    }

    fn counts(pairs: &[(&str, u64)]) -> Vec<LabelCount> {
        pairs.iter().map(|(l, f)| LabelCount::new(*l, *f)).collect()
    }

    #[test]
    fn test_prefix_exact_grouping() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[
            ("rgb_image", 120),
            ("rgb_frames", 45),
            ("xyz123", 3),
        ]));

        assert_eq!(set.len(), 1);
        let cluster = &set.clusters[0];
        assert_eq!(cluster.key, "rgb_image");
        assert_eq!(cluster.total_frequency, 165);
        assert_eq!(cluster.match_kind, MatchKind::PrefixExact);
    }

    #[test]
    fn test_prefix_category_grouping() {
        // "image" and "depth" are both modality/visual but not anchors.
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[("image_set", 90), ("depth_set", 30)]));

        assert_eq!(set.len(), 1);
        assert_eq!(set.clusters[0].match_kind, MatchKind::PrefixCategory);
    }

    #[test]
    fn test_unequal_anchors_fall_through_to_category() {
        // "rgb" and "audio" are both anchors but differ, and their
        // categories differ too — no prefix match; suffixes don't help.
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[("rgb_scan", 50), ("audio_scan", 40)]));
        assert!(set.is_empty());
    }

    #[test]
    fn test_suffix_exact_grouping() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[("sensor_data", 70), ("weather_data", 20)]));

        assert_eq!(set.len(), 1);
        assert_eq!(set.clusters[0].match_kind, MatchKind::SuffixExact);
    }

    #[test]
    fn test_suffix_category_requires_middle_overlap() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);

        // Shared middle token "depth" → suffix category match.
        let set = engine.build(&counts(&[
            ("raw_depth_mask", 60),
            ("aligned_depth_map", 25),
        ]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.clusters[0].match_kind, MatchKind::SuffixCategory);

        // Same suffix categories, disjoint middles → no match.
        let set = engine.build(&counts(&[
            ("raw_depth_mask", 60),
            ("aligned_scene_map", 25),
        ]));
        assert!(set.is_empty());
    }

    #[test]
    fn test_similarity_fallback() {
        // ratio("pointcloud", "pointclouds") = 20/21 ≈ 0.952 > 0.85.
        let table = PatternTable::default();
        let engine = ClusterEngine::new(&table, 0.85);
        let set = engine.build(&counts(&[("pointcloud", 40), ("pointclouds", 15)]));

        assert_eq!(set.len(), 1);
        assert_eq!(set.clusters[0].match_kind, MatchKind::Similarity);
    }

    #[test]
    fn test_priority_prefix_exact_beats_similarity() {
        // "rgb_image"/"rgb_images" pass both the anchor rule and the
        // similarity fallback; the recorded kind must be the higher tier.
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[("rgb_image", 120), ("rgb_images", 45)]));

        assert_eq!(set.clusters[0].match_kind, MatchKind::PrefixExact);
    }

    #[test]
    fn test_singletons_are_not_emitted() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[("depth_map", 80), ("xyz123", 3)]));
        assert!(set.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&[]);
        assert!(set.is_empty());
        assert_eq!(set.clustered_labels(), 0);
    }

    #[test]
    fn test_deterministic_tie_break_on_equal_frequency() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let forward = engine.build(&counts(&[("rgb_b", 50), ("rgb_a", 50)]));
        let reversed = engine.build(&counts(&[("rgb_a", 50), ("rgb_b", 50)]));

        // Lexicographic tie-break: "rgb_a" keys the cluster either way.
        assert_eq!(forward, reversed);
        assert_eq!(forward.clusters[0].key, "rgb_a");
    }

    #[test]
    fn test_key_is_highest_frequency_member() {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);
        let set = engine.build(&counts(&[
            ("rgb_frames", 45),
            ("rgb_image", 120),
            ("rgb_scan", 70),
        ]));

        let cluster = &set.clusters[0];
        assert_eq!(cluster.key, "rgb_image");
        let freqs: Vec<u64> = cluster.members.iter().map(|m| m.frequency).collect();
        assert_eq!(freqs, [120, 70, 45]);
    }
}
