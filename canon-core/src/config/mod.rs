//! Pattern configuration for the clustering engine.
//!
//! The table is produced by a corpus-level frequency analysis that runs
//! outside this workspace; here it is loaded, validated, and compiled into
//! the lookup structure the engine consumes. The engine never reads files
//! itself — a compiled [`PatternTable`] is injected into it.

pub mod pattern_config;
pub mod pattern_table;

pub use pattern_config::{HighFrequencyPatterns, PatternConfig};
pub use pattern_table::{CategoryKey, PatternTable, TokenRole};

/// Corpus-frequency threshold above which a token qualifies as an
/// exact-match anchor.
pub const HIGH_FREQUENCY_THRESHOLD: u64 = 100;
