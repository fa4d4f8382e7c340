//! Similarity-threshold sweep.
//!
//! Re-runs the full clustering pass at each candidate threshold and records
//! coarse shape metrics per point. The pattern tiers are threshold-blind, so
//! differences between points isolate the similarity fallback's behavior.

use canon_core::config::PatternTable;
use canon_core::LabelCount;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::ClusterEngine;

/// Shape of the clustering at one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPoint {
    pub threshold: f64,
    pub total_clusters: usize,
    pub clustered_labels: usize,
    pub avg_cluster_size: f64,
    pub max_cluster_size: usize,
}

/// Run the engine once per candidate threshold, in the order given.
pub fn sweep_thresholds(
    labels: &[LabelCount],
    table: &PatternTable,
    thresholds: &[f64],
) -> Vec<ThresholdPoint> {
    thresholds
        .iter()
        .map(|&threshold| {
            let set = ClusterEngine::new(table, threshold).build(labels);
            let total_clusters = set.len();
            let clustered_labels = set.clustered_labels();
            let max_cluster_size = set.clusters.iter().map(|c| c.len()).max().unwrap_or(0);
            let avg_cluster_size = if total_clusters == 0 {
                0.0
            } else {
                clustered_labels as f64 / total_clusters as f64
            };
            debug!(threshold, total_clusters, clustered_labels, "sweep point");
            ThresholdPoint {
                threshold,
                total_clusters,
                clustered_labels,
                avg_cluster_size,
                max_cluster_size,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Vec<LabelCount> {
        pairs.iter().map(|(l, f)| LabelCount::new(*l, *f)).collect()
    }

    #[test]
    fn test_sweep_reports_one_point_per_threshold() {
        let table = PatternTable::default();
        let labels = counts(&[("pointcloud", 40), ("pointclouds", 15)]);
        let points = sweep_thresholds(&labels, &table, &[0.5, 0.85, 0.99]);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].threshold, 0.5);
        assert_eq!(points[2].threshold, 0.99);
    }

    #[test]
    fn test_looser_threshold_admits_more() {
        // ratio("trajectory", "trajectories") = 18/22 ≈ 0.818: clustered at
        // 0.75, isolated at the 0.85 default.
        let table = PatternTable::default();
        let labels = counts(&[("trajectory", 40), ("trajectories", 15)]);
        let points = sweep_thresholds(&labels, &table, &[0.75, 0.85]);

        assert_eq!(points[0].total_clusters, 1);
        assert_eq!(points[0].clustered_labels, 2);
        assert_eq!(points[0].avg_cluster_size, 2.0);
        assert_eq!(points[0].max_cluster_size, 2);

        assert_eq!(points[1].total_clusters, 0);
        assert_eq!(points[1].clustered_labels, 0);
        assert_eq!(points[1].avg_cluster_size, 0.0);
        assert_eq!(points[1].max_cluster_size, 0);
    }

    #[test]
    fn test_empty_input_sweep() {
        let table = PatternTable::default();
        let points = sweep_thresholds(&[], &table, &[0.85]);
        assert_eq!(points[0].total_clusters, 0);
        assert_eq!(points[0].avg_cluster_size, 0.0);
    }
}
