//! Clustering effectiveness evaluation.
//!
//! Derived, read-only metrics over a finished run: compression, coverage,
//! retention, frequency-weighted match-type distribution, and cluster
//! quality (intra-cluster coherence, inter-cluster separation, size
//! statistics, silhouette estimate). Degenerate runs surface as
//! [`EvaluateError`] instead of NaN or division-by-zero panics.

use canon_core::errors::EvaluateError;
use canon_core::LabelCount;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};

use crate::engine::{ClusterSet, MatchKind};
use crate::similarity::ratio;

/// Headline effectiveness ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicMetrics {
    /// `1 − clusters / distinct labels`.
    pub compression_ratio: f64,
    /// Clustered frequency over total input frequency.
    pub frequency_coverage: f64,
    /// Clustered labels over distinct input labels.
    pub type_retention: f64,
}

/// Fraction of total matched frequency attributable to each rule tier.
/// Fractions sum to 1.0; each cluster contributes to exactly one tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingDistribution {
    pub prefix_exact: f64,
    pub prefix_category: f64,
    pub suffix_exact: f64,
    pub suffix_category: f64,
    pub similarity: f64,
}

/// Descriptive statistics over cluster sizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSizeStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: usize,
    pub max: usize,
}

/// Coherence and separation metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterQuality {
    /// Mean over clusters of the mean pairwise member similarity.
    pub avg_intra_cluster_similarity: f64,
    /// Mean over cluster pairs of the mean pairwise member distance
    /// (`1 − similarity`). Zero when fewer than two clusters exist.
    pub avg_inter_cluster_distance: f64,
    pub cluster_size_stats: ClusterSizeStats,
    /// `(inter − (1 − intra)) / max(inter, 1 − intra)`, zero-guarded.
    /// Zero when fewer than two clusters exist — nothing to separate.
    pub silhouette_estimate: f64,
}

/// Full evaluation output for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub basic: BasicMetrics,
    pub matching_distribution: MatchingDistribution,
    pub cluster_quality: ClusterQuality,
}

/// Evaluates a clustering run against the original input.
pub struct ClusteringEvaluator<'a> {
    originals: &'a [LabelCount],
    set: &'a ClusterSet,
}

impl<'a> ClusteringEvaluator<'a> {
    pub fn new(originals: &'a [LabelCount], set: &'a ClusterSet) -> Self {
        Self { originals, set }
    }

    /// Compute the full evaluation report.
    pub fn evaluate(&self) -> Result<EvaluationReport, EvaluateError> {
        if self.originals.is_empty() {
            return Err(EvaluateError::EmptyInput);
        }
        if self.set.is_empty() {
            return Err(EvaluateError::NoClusters);
        }
        let matched_frequency = self.set.clustered_frequency();
        if matched_frequency == 0 {
            return Err(EvaluateError::ZeroMatchedFrequency);
        }

        Ok(EvaluationReport {
            basic: self.basic_metrics(),
            matching_distribution: self.matching_distribution(matched_frequency),
            cluster_quality: self.cluster_quality(),
        })
    }

    fn basic_metrics(&self) -> BasicMetrics {
        let distinct = self.originals.len() as f64;
        let total_frequency: u64 = self.originals.iter().map(|l| l.frequency).sum();

        BasicMetrics {
            compression_ratio: 1.0 - self.set.len() as f64 / distinct,
            frequency_coverage: if total_frequency == 0 {
                0.0
            } else {
                self.set.clustered_frequency() as f64 / total_frequency as f64
            },
            type_retention: self.set.clustered_labels() as f64 / distinct,
        }
    }

    fn matching_distribution(&self, matched_frequency: u64) -> MatchingDistribution {
        let mut per_kind = [0u64; MatchKind::ALL.len()];
        for cluster in &self.set.clusters {
            let slot = MatchKind::ALL
                .iter()
                .position(|&k| k == cluster.match_kind)
                .unwrap_or(0);
            per_kind[slot] += cluster.total_frequency;
        }
        let fraction = |f: u64| f as f64 / matched_frequency as f64;

        MatchingDistribution {
            prefix_exact: fraction(per_kind[0]),
            prefix_category: fraction(per_kind[1]),
            suffix_exact: fraction(per_kind[2]),
            suffix_category: fraction(per_kind[3]),
            similarity: fraction(per_kind[4]),
        }
    }

    fn cluster_quality(&self) -> ClusterQuality {
        let member_names: Vec<Vec<&str>> = self
            .set
            .clusters
            .iter()
            .map(|c| c.members.iter().map(|m| m.name.as_str()).collect())
            .collect();

        // Intra: every emitted cluster has at least two members, so the
        // per-cluster pairwise mean is always defined here.
        let intra_means: Vec<f64> = member_names
            .par_iter()
            .map(|names| mean_pairwise_similarity(names))
            .collect();
        let avg_intra = mean(&intra_means);

        // Inter: mean member-to-member distance per cluster pair.
        let n = member_names.len();
        let pair_means: Vec<f64> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| mean_cross_distance(&member_names[i], &member_names[j]))
            .collect();
        let avg_inter = mean(&pair_means);

        let sizes: Vec<f64> = member_names.iter().map(|m| m.len() as f64).collect();

        ClusterQuality {
            avg_intra_cluster_similarity: avg_intra,
            avg_inter_cluster_distance: avg_inter,
            cluster_size_stats: size_stats(&sizes),
            // A lone cluster has no separation to score.
            silhouette_estimate: if n < 2 {
                0.0
            } else {
                silhouette(avg_intra, avg_inter)
            },
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_pairwise_similarity(names: &[&str]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            total += ratio(names[i], names[j]);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

fn mean_cross_distance(left: &[&str], right: &[&str]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for a in left {
        for b in right {
            total += 1.0 - ratio(a, b);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

fn size_stats(sizes: &[f64]) -> ClusterSizeStats {
    if sizes.is_empty() {
        return ClusterSizeStats::default();
    }
    let mean_size = mean(sizes);
    let variance =
        sizes.iter().map(|s| (s - mean_size).powi(2)).sum::<f64>() / sizes.len() as f64;
    let median = Data::new(sizes.to_vec()).median();

    ClusterSizeStats {
        mean: mean_size,
        median,
        std_dev: variance.sqrt(),
        min: sizes.iter().cloned().fold(f64::INFINITY, f64::min) as usize,
        max: sizes.iter().cloned().fold(0.0, f64::max) as usize,
    }
}

fn silhouette(intra: f64, inter: f64) -> f64 {
    let cohesion_gap = 1.0 - intra;
    let denom = inter.max(cohesion_gap);
    if denom <= 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (inter - cohesion_gap) / denom
}
