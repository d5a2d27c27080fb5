//! Tower Client Cache
//! ==================
//!
//! `tower-client-cache` adds transparent, opt-in response caching to
//! Tower-based HTTP client transports with pluggable stores (in-memory,
//! Redis, and more).
//!
//! The crate exposes a single [`CacheLayer`] that wraps any Tower service
//! speaking `http::Request`/`http::Response`. A request opts into caching by
//! carrying the partition header; everything else passes straight through to
//! the wrapped transport. Cache failures never fail a request — lookups
//! degrade to a live call and write failures are swallowed after logging.
//!
//! ```no_run
//! use tower::{Service, ServiceBuilder, ServiceExt};
//! use tower_client_cache::prelude::*;
//!
//! # async fn run() -> Result<(), tower_client_cache::transport::BoxError> {
//! let layer = CacheLayer::builder(InMemoryStore::new(1_000)).build();
//!
//! let mut transport = ServiceBuilder::new()
//!     .layer(layer)
//!     .service(tower::service_fn(|_req: http::Request<()>| async {
//!         Ok::<_, std::convert::Infallible>(http::Response::new(http_body_util::Full::from("ok")))
//!     }));
//!
//! let mut request = http::Request::new(());
//! request
//!     .headers_mut()
//!     .insert("x-cache-partition", http::HeaderValue::from_static("catalog"));
//!
//! let response = transport.ready().await?.call(request).await?;
//! # drop(response);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod key;
pub mod policy;
pub mod prelude;
pub mod store;
pub mod transport;

pub use codec::{BincodeCodec, CachedResponse, ResponseCodec};
pub use error::CacheError;
pub use policy::CachePolicy;
pub use store::CacheStore;
pub use transport::{CacheLayer, CacheLayerBuilder, CacheTransport};
