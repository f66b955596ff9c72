//! Error types for the ratings engine
//!
//! The numerical core never fails on degenerate input (it falls back instead),
//! so these errors only surface from configuration, data loading and the
//! snapshot store.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ratings scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingsError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Failed to load {path}: {reason}")]
    DataLoadFailed { path: String, reason: String },

    #[error("Snapshot store failure: {message}")]
    SnapshotStoreFailed { message: String },
}
