//! Error types for lln-sim
//!
//! A trial that never reaches the critical band is *not* an error; it is
//! reported as [`crate::TrialOutcome::NoCriticalPoint`].

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// lln-sim error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected before any trial runs
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Too few critical points to compute the requested statistic
    #[error("Insufficient data for statistics: {sample_count} qualifying trial(s), at least {required} required")]
    InsufficientData {
        /// Number of trials that found a critical point
        sample_count: usize,
        /// Minimum number of samples the statistic needs
        required: usize,
    },

    /// A trial record violates its structural invariants
    #[error("Invalid trial record: {0}")]
    InvalidRecord(String),

    /// Plot rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error reports missing critical-point data rather than a failure.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
