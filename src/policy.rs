use std::fmt;

use http::{HeaderMap, HeaderName, Method};

/// Runtime policy shared by the layer and the transport it builds.
///
/// The policy decides which requests opt into caching and which header
/// names carry the partition value and the hit diagnostics. Header names are
/// configuration because they have drifted across deployments; the defaults
/// are documented on the accessors. Policies are cheap to clone and
/// immutable — the `with_*` helpers return updated copies.
#[derive(Clone)]
pub struct CachePolicy {
    partition_header: HeaderName,
    cache_flag_header: HeaderName,
    origin_header: HeaderName,
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether a request may be cached.
    ///
    /// Eligible iff the method is GET or POST and the partition header is
    /// present with a non-empty value. Caching is strictly opt-in per
    /// request: the partition header both enables it and namespaces the key.
    pub fn is_cacheable(&self, method: &Method, headers: &HeaderMap) -> bool {
        if !matches!(method, &Method::GET | &Method::POST) {
            return false;
        }
        headers
            .get(&self.partition_header)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| !value.is_empty())
    }

    /// Request header that opts a request into caching. Default `x-cache-partition`.
    pub fn partition_header(&self) -> &HeaderName {
        &self.partition_header
    }

    /// Response header flagging a cache hit. Default `x-from-cache`.
    pub fn cache_flag_header(&self) -> &HeaderName {
        &self.cache_flag_header
    }

    /// Response header carrying the store's origin identifier. Default `x-cache-origin`.
    pub fn origin_header(&self) -> &HeaderName {
        &self.origin_header
    }

    pub fn with_partition_header(mut self, name: HeaderName) -> Self {
        self.partition_header = name;
        self
    }

    pub fn with_cache_flag_header(mut self, name: HeaderName) -> Self {
        self.cache_flag_header = name;
        self
    }

    pub fn with_origin_header(mut self, name: HeaderName) -> Self {
        self.origin_header = name;
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            partition_header: HeaderName::from_static("x-cache-partition"),
            cache_flag_header: HeaderName::from_static("x-from-cache"),
            origin_header: HeaderName::from_static("x-cache-origin"),
        }
    }
}

impl fmt::Debug for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("partition_header", &self.partition_header)
            .field("cache_flag_header", &self.cache_flag_header)
            .field("origin_header", &self.origin_header)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn opted_in() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-cache-partition", HeaderValue::from_static("p1"));
        headers
    }

    #[test]
    fn get_and_post_with_partition_are_cacheable() {
        let policy = CachePolicy::default();
        assert!(policy.is_cacheable(&Method::GET, &opted_in()));
        assert!(policy.is_cacheable(&Method::POST, &opted_in()));
    }

    #[test]
    fn other_methods_are_never_cacheable() {
        let policy = CachePolicy::default();
        for method in [Method::PUT, Method::DELETE, Method::HEAD, Method::PATCH] {
            assert!(!policy.is_cacheable(&method, &opted_in()));
        }
    }

    #[test]
    fn missing_or_empty_partition_header_disables_caching() {
        let policy = CachePolicy::default();
        assert!(!policy.is_cacheable(&Method::GET, &HeaderMap::new()));

        let mut empty = HeaderMap::new();
        empty.insert("x-cache-partition", HeaderValue::from_static(""));
        assert!(!policy.is_cacheable(&Method::GET, &empty));
    }

    #[test]
    fn partition_header_name_is_configurable() {
        let policy = CachePolicy::default()
            .with_partition_header(HeaderName::from_static("x-channel"));

        let mut headers = HeaderMap::new();
        headers.insert("x-channel", HeaderValue::from_static("mobile"));
        assert!(policy.is_cacheable(&Method::GET, &headers));
        assert!(!policy.is_cacheable(&Method::GET, &opted_in()));
    }
}
