//! Key-value stores backing the transport.
//!
//! The transport persists encoded responses through a [`CacheStore`]. This
//! module ships with:
//! - [`memory::InMemoryStore`] — a fast, process-local store backed by [`moka`].
//! - `redis::RedisStore` *(optional)* — a distributed store when the
//!   `redis-store` crate feature is enabled.
//!
//! Stores hold opaque byte payloads and own expiry entirely: a backend may
//! drop entries on whatever schedule it was configured with, and the
//! transport simply observes the resulting miss.

pub mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::CacheError;

#[async_trait]
pub trait CacheStore: Send + Sync + Clone + 'static {
    /// Stores `value` under `key`, overwriting any previous entry.
    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError>;

    /// Fetches the payload stored under `key`.
    ///
    /// Fails with [`CacheError::Missed`] when the key is absent and with a
    /// storage-internal error when the backend itself fails.
    async fn get(&self, key: &str) -> Result<Bytes, CacheError>;

    /// Removes the entry for `key`, if present.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every entry held by the store.
    async fn flush(&self) -> Result<(), CacheError>;

    /// Short identifier of the backend, surfaced in hit diagnostics.
    fn origin(&self) -> &'static str;
}
