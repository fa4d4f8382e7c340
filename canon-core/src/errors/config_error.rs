//! Configuration errors.

use crate::config::TokenRole;

/// Errors raised while loading or compiling the pattern configuration.
///
/// Configuration faults are not recoverable: clustering must not start
/// against a table whose category assignments are ambiguous.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse pattern config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(
        "Token {token:?} ({role}) is declared in both category {existing:?} and {conflicting:?}"
    )]
    ConflictingCategory {
        role: TokenRole,
        token: String,
        existing: String,
        conflicting: String,
    },
}
