//! Isolated-label analysis.
//!
//! Characterizes the labels the engine left unclustered: fixed frequency
//! bands, and within each band a lexical-shape classification. Separator
//! check runs first, then the non-alphanumeric check, so every label lands
//! in exactly one shape category.

use canon_core::types::collections::FxHashSet;
use canon_core::LabelCount;
use serde::{Deserialize, Serialize};

use crate::engine::ClusterSet;

/// Fixed frequency bands, highest first. Frequency 0 belongs to no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    /// 500 and above.
    VeryHigh,
    /// 100–499.
    High,
    /// 50–99.
    Mid,
    /// 10–49.
    Low,
    /// 1–9.
    Rare,
}

impl FrequencyBand {
    pub const ALL: [FrequencyBand; 5] = [
        FrequencyBand::VeryHigh,
        FrequencyBand::High,
        FrequencyBand::Mid,
        FrequencyBand::Low,
        FrequencyBand::Rare,
    ];

    /// Band a frequency falls into, if any.
    pub fn classify(frequency: u64) -> Option<Self> {
        match frequency {
            500.. => Some(Self::VeryHigh),
            100..=499 => Some(Self::High),
            50..=99 => Some(Self::Mid),
            10..=49 => Some(Self::Low),
            1..=9 => Some(Self::Rare),
            0 => None,
        }
    }

    /// Human-readable range label.
    pub fn range_label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "500+",
            Self::High => "100-499",
            Self::Mid => "50-99",
            Self::Low => "10-49",
            Self::Rare => "1-9",
        }
    }
}

/// Lexical shape of an isolated label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelShape {
    /// Contains a separator character (`_`, `-`, or space).
    SpecialPattern,
    /// Contains non-alphanumeric characters other than separators.
    PotentialError,
    /// Purely alphanumeric.
    SimpleType,
}

impl LabelShape {
    pub fn classify(label: &str) -> Self {
        if label.chars().any(|c| c == '_' || c == '-' || c == ' ') {
            Self::SpecialPattern
        } else if label.is_empty() || !label.chars().all(char::is_alphanumeric) {
            Self::PotentialError
        } else {
            Self::SimpleType
        }
    }
}

/// One frequency band's breakdown, shape by shape. Entries are sorted by
/// frequency descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandBreakdown {
    pub band: FrequencyBand,
    pub special_pattern: Vec<LabelCount>,
    pub potential_errors: Vec<LabelCount>,
    pub simple_types: Vec<LabelCount>,
}

impl BandBreakdown {
    fn new(band: FrequencyBand) -> Self {
        Self {
            band,
            special_pattern: Vec::new(),
            potential_errors: Vec::new(),
            simple_types: Vec::new(),
        }
    }

    /// Number of isolated labels in this band.
    pub fn len(&self) -> usize {
        self.special_pattern.len() + self.potential_errors.len() + self.simple_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Full isolated-label report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsolatedReport {
    pub total_isolated: usize,
    pub total_frequency: u64,
    /// Breakdown per band, highest band first.
    pub bands: Vec<BandBreakdown>,
}

/// Analyze the complement of the clustered label set.
pub fn analyze_isolated(originals: &[LabelCount], set: &ClusterSet) -> IsolatedReport {
    let clustered: FxHashSet<&str> = set
        .clusters
        .iter()
        .flat_map(|c| c.members.iter().map(|m| m.name.as_str()))
        .collect();

    let mut bands: Vec<BandBreakdown> = FrequencyBand::ALL
        .iter()
        .map(|&band| BandBreakdown::new(band))
        .collect();
    let mut total_isolated = 0usize;
    let mut total_frequency = 0u64;

    for record in originals {
        if clustered.contains(record.label.as_str()) {
            continue;
        }
        total_isolated += 1;
        total_frequency += record.frequency;

        let Some(band) = FrequencyBand::classify(record.frequency) else {
            continue;
        };
        let slot = &mut bands[FrequencyBand::ALL
            .iter()
            .position(|&b| b == band)
            .unwrap_or(0)];
        let bucket = match LabelShape::classify(&record.label) {
            LabelShape::SpecialPattern => &mut slot.special_pattern,
            LabelShape::PotentialError => &mut slot.potential_errors,
            LabelShape::SimpleType => &mut slot.simple_types,
        };
        bucket.push(record.clone());
    }

    for band in &mut bands {
        for bucket in [
            &mut band.special_pattern,
            &mut band.potential_errors,
            &mut band.simple_types,
        ] {
            bucket.sort_by(|a, b| {
                b.frequency
                    .cmp(&a.frequency)
                    .then_with(|| a.label.cmp(&b.label))
            });
        }
    }

    IsolatedReport {
        total_isolated,
        total_frequency,
        bands,
    }
}
