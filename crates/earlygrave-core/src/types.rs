//! Request type and query-string access used throughout the filter chain.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type that flows through a filter.
///
/// This is a standard `http::Request` with a `Full<Bytes>` body. Its
/// extensions map doubles as the per-request context that extractors
/// attach derived data to.
pub type Request = http::Request<Full<Bytes>>;

/// Decoded query parameters of a request.
///
/// Lookups follow first-value-by-key semantics: when a key repeats, the
/// first occurrence wins. A pair containing a malformed percent escape
/// (`%` not followed by two hex digits) is dropped as if it were absent.
///
/// # Example
///
/// ```
/// use earlygrave_core::QueryParams;
///
/// let params = QueryParams::parse("limit=10&sort=-name&limit=20&empty=");
/// assert_eq!(params.get("limit"), Some("10"));
/// assert_eq!(params.get("sort"), Some("-name"));
/// assert_eq!(params.get("empty"), Some(""));
/// assert_eq!(params.get_non_empty("empty"), None);
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses a raw, URL-encoded query string (without the leading `?`).
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let well_formed: Vec<&str> = query
            .split('&')
            .filter(|pair| {
                let valid = has_valid_escapes(pair);
                if !valid {
                    tracing::trace!(pair = %pair, "dropping query pair with malformed escape");
                }
                valid
            })
            .collect();

        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(&well_formed.join("&"))
            .unwrap_or_default();
        Self { pairs }
    }

    /// Reads the query parameters of a request.
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        request.uri().query().map(Self::parse).unwrap_or_default()
    }

    /// Returns the first value for `key`, if the key is present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first value for `key` unless it is absent or empty.
    ///
    /// Absent and empty values are treated the same by every parameter step.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Returns true if no pairs were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn has_valid_escapes(pair: &str) -> bool {
    let bytes = pair.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
