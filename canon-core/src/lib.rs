//! canon-core: shared foundation for the label canonicalization engine.
//!
//! Provides:
//! - Types: input records and hash-collection aliases
//! - Errors: one enum per subsystem, `thiserror` only
//! - Config: pattern-category tables and high-frequency anchors
//! - Telemetry: tracing subscriber setup

pub mod config;
pub mod errors;
pub mod telemetry;
pub mod types;

pub use config::{CategoryKey, PatternConfig, PatternTable, TokenRole, HIGH_FREQUENCY_THRESHOLD};
pub use errors::{ConfigError, EvaluateError, IngestError};
pub use types::LabelCount;
