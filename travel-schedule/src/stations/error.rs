//! Station cache error types.

/// Errors that can occur when persisting the station listing.
#[derive(Debug, thiserror::Error)]
pub enum StationCacheError {
    /// Filesystem operation failed
    #[error("cache I/O error: {message}")]
    Io { message: String },

    /// Failed to encode the listing
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
