use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use super::CacheStore;
use crate::error::CacheError;

/// A distributed [`CacheStore`] implementation backed by Redis.
///
/// Keys are prefixed with a namespace so unrelated consumers can share a
/// database. When an expiry is configured, entries are written with
/// `SET ... EX`, leaving eviction entirely to Redis.
#[derive(Clone)]
pub struct RedisStore {
    connection: Arc<Mutex<ConnectionManager>>,
    namespace: String,
    expiry: Option<Duration>,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
            namespace: "tower_client_cache".to_owned(),
            expiry: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets a fixed expiry applied to every stored entry.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn set(&self, key: &str, value: Bytes) -> Result<(), CacheError> {
        let mut conn = self.connection.lock().await;
        match self.expiry {
            Some(expiry) => {
                let secs = expiry.as_secs().max(1);
                let _: () = conn.set_ex(self.make_key(key), value.as_ref(), secs).await?;
            }
            None => {
                let _: () = conn.set(self.make_key(key), value.as_ref()).await?;
            }
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, CacheError> {
        let mut conn = self.connection.lock().await;
        let data: Option<Vec<u8>> = conn.get(self.make_key(key)).await?;
        data.map(Bytes::from).ok_or(CacheError::Missed)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection.lock().await;
        let _: () = conn.del(self.make_key(key)).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.connection.lock().await;
        let _: () = redis::cmd("FLUSHDB").query_async(&mut *conn).await?;
        Ok(())
    }

    fn origin(&self) -> &'static str {
        "REDIS"
    }
}
