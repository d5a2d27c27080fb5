use bytes::Bytes;
use http::{HeaderName, HeaderValue, Response, StatusCode, Version};
use http_body_util::Full;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Fully materialized response captured for storage.
///
/// Headers are kept as an ordered list of raw name/value pairs so
/// multi-valued headers survive the round trip untouched.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Bytes,
}

impl CachedResponse {
    pub fn new(
        status: StatusCode,
        version: Version,
        headers: Vec<(String, Vec<u8>)>,
        body: Bytes,
    ) -> Self {
        Self {
            status,
            version,
            headers,
            body,
        }
    }

    /// Captures the parts of a collected response.
    pub fn from_parts(parts: &http::response::Parts, body: Bytes) -> Self {
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| (name.as_str().to_owned(), value.as_bytes().to_vec()))
            .collect();
        Self::new(parts.status, parts.version, headers, body)
    }

    /// Converts the entry back into an `http::Response`.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::from(self.body));
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;

        let headers = response.headers_mut();
        headers.clear();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(&value),
            ) {
                headers.append(name, value);
            }
        }

        response
    }
}

/// Trait representing a serialization strategy for cached responses.
///
/// `encode` runs only after the live body has been fully collected;
/// `decode` must reject anything that does not parse back into a
/// well-formed response with [`CacheError::InvalidCachedResponse`].
pub trait ResponseCodec: Send + Sync + Clone + 'static {
    fn encode(&self, response: &CachedResponse) -> Result<Vec<u8>, CacheError>;
    fn decode(&self, bytes: &[u8]) -> Result<CachedResponse, CacheError>;
}

/// Default [`ResponseCodec`] implementation backed by `bincode`.
#[derive(Clone, Default)]
pub struct BincodeCodec;

#[derive(Serialize, Deserialize)]
struct StoredResponse {
    status: u16,
    version: u8,
    headers: Vec<(String, Vec<u8>)>,
    body: Vec<u8>,
}

impl ResponseCodec for BincodeCodec {
    fn encode(&self, response: &CachedResponse) -> Result<Vec<u8>, CacheError> {
        let stored = StoredResponse {
            status: response.status.as_u16(),
            version: version_to_u8(response.version),
            headers: response.headers.clone(),
            body: response.body.to_vec(),
        };

        bincode::serialize(&stored).map_err(|err| CacheError::FailedToSave(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<CachedResponse, CacheError> {
        let stored: StoredResponse = bincode::deserialize(bytes)
            .map_err(|err| CacheError::InvalidCachedResponse(err.to_string()))?;
        let response = CachedResponse::new(
            StatusCode::from_u16(stored.status)
                .map_err(|err| CacheError::InvalidCachedResponse(err.to_string()))?,
            version_from_u8(stored.version)?,
            stored.headers,
            Bytes::from(stored.body),
        );
        Ok(response)
    }
}

fn version_to_u8(version: Version) -> u8 {
    match version {
        Version::HTTP_09 => 0,
        Version::HTTP_10 => 1,
        Version::HTTP_11 => 2,
        Version::HTTP_2 => 3,
        Version::HTTP_3 => 4,
        _ => 2,
    }
}

fn version_from_u8(value: u8) -> Result<Version, CacheError> {
    match value {
        0 => Ok(Version::HTTP_09),
        1 => Ok(Version::HTTP_10),
        2 => Ok(Version::HTTP_11),
        3 => Ok(Version::HTTP_2),
        4 => Ok(Version::HTTP_3),
        _ => Err(CacheError::InvalidCachedResponse(
            "unknown HTTP version".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CachedResponse {
        CachedResponse::new(
            StatusCode::CREATED,
            Version::HTTP_11,
            vec![
                ("content-type".to_owned(), b"application/json".to_vec()),
                ("set-cookie".to_owned(), b"a=1".to_vec()),
                ("set-cookie".to_owned(), b"b=2".to_vec()),
            ],
            Bytes::from_static(b"{\"ok\":true}"),
        )
    }

    #[test]
    fn round_trip_preserves_status_headers_and_body() {
        let codec = BincodeCodec;
        let original = sample();

        let bytes = codec.encode(&original).expect("encode succeeds");
        let decoded = codec.decode(&bytes).expect("decode succeeds");

        assert_eq!(decoded.status, original.status);
        assert_eq!(decoded.version, original.version);
        assert_eq!(decoded.headers, original.headers);
        assert_eq!(decoded.body, original.body);
    }

    #[test]
    fn round_trip_handles_empty_body() {
        let codec = BincodeCodec;
        let original =
            CachedResponse::new(StatusCode::NO_CONTENT, Version::HTTP_2, Vec::new(), Bytes::new());

        let bytes = codec.encode(&original).expect("encode succeeds");
        let decoded = codec.decode(&bytes).expect("decode succeeds");

        assert_eq!(decoded.status, StatusCode::NO_CONTENT);
        assert!(decoded.headers.is_empty());
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn decode_rejects_corrupted_bytes() {
        let codec = BincodeCodec;
        let err = codec
            .decode(b"definitely not a serialized response")
            .expect_err("corrupted bytes must not decode");

        assert!(matches!(err, CacheError::InvalidCachedResponse(_)));
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let codec = BincodeCodec;
        let mut bytes = codec.encode(&sample()).expect("encode succeeds");
        bytes.truncate(bytes.len() / 2);

        let err = codec.decode(&bytes).expect_err("truncated payload must not decode");
        assert!(matches!(err, CacheError::InvalidCachedResponse(_)));
    }

    #[test]
    fn into_response_rebuilds_multi_valued_headers() {
        let response = sample().into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let cookies: Vec<_> = response.headers().get_all("set-cookie").iter().collect();
        assert_eq!(cookies.len(), 2);
    }
}
