//! canon-cluster: the label canonicalization engine.
//!
//! Groups a noisy vocabulary of free-text data-type labels into semantically
//! equivalent clusters and derives reproducible quality statistics:
//! - Ingest: lenient parsing of the `(label, frequency)` input list
//! - Normalize: canonical token sequences per label
//! - Similarity: Ratcliff/Obershelp string ratio
//! - Engine: deterministic greedy single-pass clustering
//! - Stats: per-match-type accounting and the serializable cluster map
//! - Evaluate: compression, coverage, retention, and cluster quality
//! - Isolated: frequency banding and lexical shapes of unclustered labels
//! - Sweep: engine re-runs across a similarity-threshold list

pub mod engine;
pub mod evaluate;
pub mod ingest;
pub mod isolated;
pub mod normalize;
pub mod similarity;
pub mod stats;
pub mod sweep;

pub use engine::{Cluster, ClusterEngine, ClusterMember, ClusterSet, MatchKind};
pub use evaluate::{ClusteringEvaluator, EvaluationReport};
pub use ingest::{parse_label_counts, read_label_counts, IngestOutcome};
pub use isolated::{analyze_isolated, FrequencyBand, IsolatedReport, LabelShape};
pub use normalize::{normalize, NormalizedLabel};
pub use similarity::{ratio, DEFAULT_SIMILARITY_THRESHOLD};
pub use stats::{AnalysisResults, AnalysisStatistics};
pub use sweep::{sweep_thresholds, ThresholdPoint};
