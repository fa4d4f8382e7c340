//! Error handling for the canonicalization engine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod evaluate_error;
pub mod ingest_error;

pub use config_error::ConfigError;
pub use evaluate_error::EvaluateError;
pub use ingest_error::IngestError;
