//! Re-exports for consumers who prefer a single import.
//!
//! ```no_run
//! use tower_client_cache::prelude::*;
//! # let store = InMemoryStore::new(128);
//! let layer = CacheLayer::builder(store).build();
//! ```

pub use crate::codec::{BincodeCodec, CachedResponse, ResponseCodec};
pub use crate::error::CacheError;
pub use crate::policy::CachePolicy;
pub use crate::store::memory::InMemoryStore;
#[cfg(feature = "redis-store")]
pub use crate::store::redis::RedisStore;
pub use crate::store::CacheStore;
pub use crate::transport::{CacheLayer, CacheLayerBuilder, CacheTransport};
