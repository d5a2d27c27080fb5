use thiserror::Error;

/// Errors raised by the caching path.
///
/// None of these ever reach a caller of the transport: reads degrade to a
/// live fetch and writes are swallowed after logging. They exist so the
/// degrade branches stay visible and so log lines can tell a plain miss
/// apart from corrupted data or a backend outage.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key is absent in the store. Expected and non-exceptional.
    #[error("cache missed")]
    Missed,

    /// Stored bytes failed to parse back into a response. A data-integrity
    /// signal; handled like a miss but logged distinctly.
    #[error("invalid cached response: {0}")]
    InvalidCachedResponse(String),

    /// Backend-specific failure: connectivity, timeout, protocol error.
    #[error("storage internal error: {0}")]
    StorageInternal(String),

    /// A write attempt failed. Logged, never surfaced.
    #[error("failed to save to cache: {0}")]
    FailedToSave(String),

    #[cfg(feature = "redis-store")]
    #[error(transparent)]
    Redis(#[from] redis::RedisError),
}
