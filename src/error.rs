//! Error types for the significance clustering pipeline

use thiserror::Error;

/// Errors surfaced by the clustering library
///
/// Randomness and acceptance decisions inside the search never raise;
/// only structural misuse (bad configuration, out-of-order API calls)
/// produces one of these.
#[derive(Debug, Error)]
pub enum SigCluError {
    /// A configuration option was outside its legal range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The ensemble has no partitions to score against
    #[error("ensemble contains no partitions")]
    EmptyEnsemble,

    /// Results were requested before run() completed
    #[error("no results available: run() has not completed")]
    MissingResult,
}
