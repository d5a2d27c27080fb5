//! Cache key derivation.
//!
//! The key is a deterministic function of the request method, path, query
//! string, `Authorization` header, and the partition header. Derivation only
//! reads the request; it never rewrites any of its fields.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, Method, Uri};

const SEPARATOR: char = ' ';

/// Derives the cache key for a request.
///
/// Components are concatenated in fixed order: uppercased method, path with
/// the raw query appended when non-empty, then the `Authorization` value and
/// the partition header value, each only when present and non-empty. Absent
/// components are skipped rather than replaced by a placeholder, so presence
/// itself is part of the key.
pub fn derive(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    partition_header: &HeaderName,
) -> String {
    let mut key = method.as_str().to_ascii_uppercase();

    key.push(SEPARATOR);
    key.push_str(uri.path());
    if let Some(query) = uri.query() {
        if !query.is_empty() {
            key.push('?');
            key.push_str(query);
        }
    }

    for name in [&AUTHORIZATION, partition_header] {
        if let Some(value) = header_str(headers, name) {
            key.push(SEPARATOR);
            key.push_str(value);
        }
    }

    key
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
