use std::error::Error as StdError;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use http::{HeaderValue, Request, Response};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use tower::{Layer, Service, ServiceExt};

use crate::codec::{BincodeCodec, CachedResponse, ResponseCodec};
use crate::error::CacheError;
use crate::key;
use crate::policy::CachePolicy;
use crate::store::CacheStore;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Caching layer for Tower-based HTTP client transports.
///
/// The layer wraps an inner transport and serves eligible requests from the
/// configured [`CacheStore`] instead of performing the round trip. The inner
/// transport is always supplied explicitly through [`Layer::layer`]; there is
/// no implicit default.
///
/// Cloning a `CacheLayer` is cheap and shares the underlying store handle.
#[derive(Clone)]
pub struct CacheLayer<St, C = BincodeCodec> {
    store: St,
    policy: CachePolicy,
    codec: C,
}

/// Builder for configuring [`CacheLayer`] instances.
pub struct CacheLayerBuilder<St, C = BincodeCodec> {
    store: St,
    policy: CachePolicy,
    codec: C,
}

impl<St> CacheLayerBuilder<St, BincodeCodec>
where
    St: CacheStore,
{
    pub fn new(store: St) -> Self {
        Self {
            store,
            policy: CachePolicy::default(),
            codec: BincodeCodec,
        }
    }
}

impl<St, C> CacheLayerBuilder<St, C>
where
    St: CacheStore,
{
    /// Replaces the policy with a pre-built value.
    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the request header that opts a request into caching.
    pub fn partition_header(mut self, name: http::HeaderName) -> Self {
        self.policy = self.policy.with_partition_header(name);
        self
    }

    /// Sets the response header flagging a cache hit.
    pub fn cache_flag_header(mut self, name: http::HeaderName) -> Self {
        self.policy = self.policy.with_cache_flag_header(name);
        self
    }

    /// Sets the response header carrying the store origin.
    pub fn origin_header(mut self, name: http::HeaderName) -> Self {
        self.policy = self.policy.with_origin_header(name);
        self
    }

    /// Swaps the serialization strategy for stored responses.
    pub fn codec<NC>(self, codec: NC) -> CacheLayerBuilder<St, NC> {
        CacheLayerBuilder {
            store: self.store,
            policy: self.policy,
            codec,
        }
    }

    pub fn build(self) -> CacheLayer<St, C> {
        CacheLayer {
            store: self.store,
            policy: self.policy,
            codec: self.codec,
        }
    }
}

impl<St> CacheLayer<St, BincodeCodec>
where
    St: CacheStore,
{
    /// Builds a cache layer with the default [`CachePolicy`] and codec.
    pub fn new(store: St) -> Self {
        CacheLayerBuilder::new(store).build()
    }

    /// Returns a builder for fine-grained control over policy and codec.
    pub fn builder(store: St) -> CacheLayerBuilder<St, BincodeCodec> {
        CacheLayerBuilder::new(store)
    }
}

impl<S, St, C> Layer<S> for CacheLayer<St, C>
where
    St: CacheStore,
    C: ResponseCodec,
{
    type Service = CacheTransport<S, St, C>;

    fn layer(&self, inner: S) -> Self::Service {
        CacheTransport {
            inner,
            store: self.store.clone(),
            policy: self.policy.clone(),
            codec: self.codec.clone(),
        }
    }
}

/// Transport decorator produced by [`CacheLayer`].
///
/// Holds no mutable state of its own; the store and the inner transport are
/// externally synchronized handles, so the transport can serve any number of
/// concurrent in-flight requests.
#[derive(Clone)]
pub struct CacheTransport<S, St, C = BincodeCodec> {
    inner: S,
    store: St,
    policy: CachePolicy,
    codec: C,
}

/// Outcome of a cache lookup.
///
/// `Miss` and `Failed` both degrade to a live call; the distinction only
/// feeds logging.
enum Lookup {
    Hit(CachedResponse),
    Miss,
    Failed(CacheError),
}

async fn lookup<St, C>(store: &St, codec: &C, key: &str) -> Lookup
where
    St: CacheStore,
    C: ResponseCodec,
{
    match store.get(key).await {
        Ok(bytes) => match codec.decode(&bytes) {
            Ok(cached) => Lookup::Hit(cached),
            Err(err) => Lookup::Failed(err),
        },
        Err(CacheError::Missed) => Lookup::Miss,
        Err(err) => Lookup::Failed(err),
    }
}

async fn save<St, C>(
    store: &St,
    codec: &C,
    key: &str,
    cached: &CachedResponse,
) -> Result<(), CacheError>
where
    St: CacheStore,
    C: ResponseCodec,
{
    let payload = codec.encode(cached)?;
    store
        .set(key, Bytes::from(payload))
        .await
        .map_err(|err| CacheError::FailedToSave(err.to_string()))
}

fn annotate_hit(
    mut response: Response<Full<Bytes>>,
    origin: &'static str,
    policy: &CachePolicy,
) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    headers.insert(policy.cache_flag_header().clone(), HeaderValue::from_static("true"));
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(policy.origin_header().clone(), value);
    }
    response
}

impl<S, St, C, ReqBody, ResBody> Service<Request<ReqBody>> for CacheTransport<S, St, C>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
    ReqBody: Send + 'static,
    ResBody: Body<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError> + Send,
    St: CacheStore,
    C: ResponseCodec,
{
    type Response = Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let key = self
            .policy
            .is_cacheable(req.method(), req.headers())
            .then(|| {
                key::derive(
                    req.method(),
                    req.uri(),
                    req.headers(),
                    self.policy.partition_header(),
                )
            });

        let store = self.store.clone();
        let policy = self.policy.clone();
        let codec = self.codec.clone();
        let inner = self.inner.clone();

        Box::pin(async move {
            if let Some(key) = &key {
                match lookup(&store, &codec, key).await {
                    Lookup::Hit(cached) => {
                        tracing::debug!(key = %key, origin = store.origin(), "cache hit");
                        return Ok(annotate_hit(cached.into_response(), store.origin(), &policy));
                    }
                    Lookup::Miss => {
                        tracing::debug!(key = %key, "cache miss");
                    }
                    Lookup::Failed(err) => {
                        tracing::warn!(key = %key, error = %err, "cache lookup failed, using live call");
                    }
                }
            }

            // A live failure propagates as-is; nothing is ever stored for it.
            let response = inner.oneshot(req).await.map_err(Into::into)?;
            let (parts, body) = response.into_parts();
            let body = BodyExt::collect(body).await.map_err(Into::into)?.to_bytes();

            if let Some(key) = &key {
                let cached = CachedResponse::from_parts(&parts, body.clone());
                match save(&store, &codec, key, &cached).await {
                    Ok(()) => tracing::debug!(key = %key, "response stored"),
                    Err(err) => {
                        tracing::warn!(key = %key, error = %err, "failed to save response to cache");
                    }
                }
            }

            Ok(Response::from_parts(parts, Full::from(body)))
        })
    }
}
