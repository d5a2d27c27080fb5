use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;

use super::CacheStore;
use crate::error::CacheError;

/// An in-memory [`CacheStore`] implementation backed by [`moka`].
///
/// The store is cheap to clone and shares a single underlying cache. Expiry
/// is enforced by `moka` when a time-to-live is configured; without one,
/// entries live until evicted by capacity pressure.
#[derive(Clone)]
pub struct InMemoryStore {
    cache: Cache<String, Bytes>,
}

impl InMemoryStore {
    /// Creates a new in-memory store with the provided `max_capacity`.
    ///
    /// The capacity is expressed in number of entries, not bytes.
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a store whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        self.cache.insert(key.to_owned(), value).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, CacheError> {
        self.cache.get(key).await.ok_or(CacheError::Missed)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        self.cache.invalidate_all();
        Ok(())
    }

    fn origin(&self) -> &'static str {
        "MEMORY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn set_then_get_returns_stored_bytes() {
        let store = InMemoryStore::new(16);

        store
            .set("key", Bytes::from_static(b"alpha"))
            .await
            .expect("set succeeds");

        let value = store.get("key").await.expect("get succeeds");
        assert_eq!(value, Bytes::from_static(b"alpha"));
    }

    #[tokio::test]
    async fn get_of_absent_key_is_a_miss() {
        let store = InMemoryStore::new(16);
        let err = store.get("absent").await.expect_err("key is absent");
        assert!(matches!(err, CacheError::Missed));
    }

    #[tokio::test]
    async fn overwrite_replaces_previous_entry() {
        let store = InMemoryStore::new(16);
        store
            .set("key", Bytes::from_static(b"old"))
            .await
            .expect("set succeeds");
        store
            .set("key", Bytes::from_static(b"new"))
            .await
            .expect("overwrite succeeds");

        let value = store.get("key").await.expect("get succeeds");
        assert_eq!(value, Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn delete_and_flush_remove_entries() {
        let store = InMemoryStore::new(16);
        store
            .set("a", Bytes::from_static(b"1"))
            .await
            .expect("set succeeds");
        store
            .set("b", Bytes::from_static(b"2"))
            .await
            .expect("set succeeds");

        store.delete("a").await.expect("delete succeeds");
        assert!(matches!(store.get("a").await, Err(CacheError::Missed)));

        store.flush().await.expect("flush succeeds");
        sleep(Duration::from_millis(10)).await;
        assert!(matches!(store.get("b").await, Err(CacheError::Missed)));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let store = InMemoryStore::with_ttl(16, Duration::from_millis(20));
        store
            .set("key", Bytes::from_static(b"short-lived"))
            .await
            .expect("set succeeds");

        sleep(Duration::from_millis(40)).await;
        assert!(matches!(store.get("key").await, Err(CacheError::Missed)));
    }

    #[test]
    fn origin_identifies_the_backend() {
        assert_eq!(InMemoryStore::new(1).origin(), "MEMORY");
    }
}
