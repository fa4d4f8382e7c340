//! Evaluation errors.

/// Degenerate-statistics conditions surfaced as explicit results instead of
/// division-by-zero panics or silent NaN propagation.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    #[error("Input label set is empty; nothing to evaluate")]
    EmptyInput,

    #[error("No clusters were formed; no clustering achieved")]
    NoClusters,

    #[error("Total matched frequency is zero; no clustering achieved")]
    ZeroMatchedFrequency,
}
