//! Pagination bounds from the `limit` and `offset` query parameters.
//!
//! [`pagination_validator`] rejects values that are not base-10 integers;
//! [`pagination_extractor`] attaches a [`Pagination`] built from the query
//! string on top of caller-supplied defaults. Values are kept as the raw
//! strings that appeared in the query.

use crate::context::attach_pagination;
use earlygrave_core::{
    Extract, ExtractParam, FilterError, FilterResult, QueryParams, Request, Validate,
    ValidateParam,
};
use serde::{Deserialize, Serialize};

/// Query parameter holding the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter holding the page start.
pub const OFFSET_PARAM: &str = "offset";

/// Pagination bounds for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of items to return.
    pub limit: String,
    /// Number of items to skip.
    pub offset: String,
}

impl Pagination {
    /// Creates pagination bounds.
    pub fn new(limit: impl Into<String>, offset: impl Into<String>) -> Self {
        Self {
            limit: limit.into(),
            offset: offset.into(),
        }
    }

    /// Parses the limit as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ParameterFormat`] if the stored limit is not a
    /// base-10 integer, which can only happen for unvalidated defaults.
    pub fn limit_value(&self) -> Result<i64, FilterError> {
        parse_integer(LIMIT_PARAM, &self.limit)
    }

    /// Parses the offset as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ParameterFormat`] if the stored offset is not a
    /// base-10 integer.
    pub fn offset_value(&self) -> Result<i64, FilterError> {
        parse_integer(OFFSET_PARAM, &self.offset)
    }
}

fn parse_integer(parameter: &str, value: &str) -> Result<i64, FilterError> {
    value
        .parse::<i64>()
        .map_err(|e| FilterError::parameter_format(parameter, value, e))
}

/// Checks that `limit` and `offset`, when given, are integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationValidator;

impl Validate for PaginationValidator {
    fn name(&self) -> &'static str {
        "pagination_validator"
    }

    fn validate(&self, request: &Request) -> Result<(), FilterError> {
        let params = QueryParams::from_request(request);
        for parameter in [LIMIT_PARAM, OFFSET_PARAM] {
            if let Some(value) = params.get_non_empty(parameter) {
                parse_integer(parameter, value)?;
            }
        }
        Ok(())
    }
}

/// Attaches pagination built from the query string over defaults.
#[derive(Debug, Clone)]
pub struct PaginationExtractor {
    defaults: Pagination,
}

impl PaginationExtractor {
    /// Creates an extractor falling back to `defaults`.
    #[must_use]
    pub fn new(defaults: Pagination) -> Self {
        Self { defaults }
    }

    /// Returns the defaults.
    #[must_use]
    pub fn defaults(&self) -> &Pagination {
        &self.defaults
    }

    /// Builds the pagination for a request without attaching it.
    #[must_use]
    pub fn resolve(&self, params: &QueryParams) -> Pagination {
        let mut pagination = self.defaults.clone();
        if let Some(limit) = params.get_non_empty(LIMIT_PARAM) {
            pagination.limit = limit.to_string();
        }
        if let Some(offset) = params.get_non_empty(OFFSET_PARAM) {
            pagination.offset = offset.to_string();
        }
        pagination
    }
}

impl Extract for PaginationExtractor {
    fn name(&self) -> &'static str {
        "pagination_extractor"
    }

    fn extract(&self, mut request: Request) -> FilterResult {
        let pagination = self.resolve(&QueryParams::from_request(&request));
        tracing::trace!(limit = %pagination.limit, offset = %pagination.offset, "extracted pagination");
        attach_pagination(&mut request, pagination);
        Ok(request)
    }
}

/// Returns a step rejecting non-integer `limit` / `offset` values.
///
/// Absent or empty values pass; no default is applied here.
///
/// # Example
///
/// ```
/// use earlygrave_params::pagination_validator;
/// use earlygrave_core::{filter, FilterError};
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let filter = filter![pagination_validator()];
/// let request = http::Request::builder()
///     .uri("/?limit=s200")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let err = filter.apply(request).unwrap_err().into_error();
/// assert!(matches!(err, FilterError::ParameterFormat { ref value, .. } if value == "s200"));
/// ```
#[must_use]
pub fn pagination_validator() -> ValidateParam<PaginationValidator> {
    ValidateParam::new(PaginationValidator)
}

/// Returns a step attaching [`Pagination`] to every request.
///
/// Never rejects.
#[must_use]
pub fn pagination_extractor(defaults: Pagination) -> ExtractParam<PaginationExtractor> {
    ExtractParam::new(PaginationExtractor::new(defaults))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::get_pagination_context;
    use bytes::Bytes;
    use earlygrave_core::{filter, Filter};
    use http_body_util::Full;
    use proptest::prelude::*;

    fn make_request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn defaults() -> Pagination {
        Pagination::new("30", "0")
    }

    #[test]
    fn test_pagination_validator_accepts() {
        let filter = filter![pagination_validator()];

        for uri in ["/", "/?limit=100", "/?offset=3", "/?offset=3&limit=34", "/?limit=&offset=", "/?limit=-5&offset=%2B2"] {
            assert!(filter.apply(make_request(uri)).is_ok(), "expected {uri} to be valid");
        }
    }

    #[test]
    fn test_pagination_validator_rejects() {
        let filter = filter![pagination_validator()];

        for (uri, parameter, raw) in [
            ("/?limit=s200", "limit", "s200"),
            ("/?offset=blabla", "offset", "blabla"),
            ("/?limit=10&offset=1.5", "offset", "1.5"),
            ("/?limit=99999999999999999999", "limit", "99999999999999999999"),
        ] {
            let rejection = filter.apply(make_request(uri)).unwrap_err();
            match rejection.error() {
                FilterError::ParameterFormat { parameter: p, value, .. } => {
                    assert_eq!(p, parameter);
                    assert_eq!(value, raw);
                }
                other => panic!("expected ParameterFormat for {uri}, got {other:?}"),
            }
            assert!(rejection.to_string().starts_with(&format!("parsing \"{raw}\": ")));
        }
    }

    #[test]
    fn test_pagination_validator_leaves_request_untouched() {
        let filter = filter![pagination_validator()];

        let rejection = filter.apply(make_request("/?limit=s200")).unwrap_err();
        assert_eq!(rejection.request().uri(), "/?limit=s200");
        assert!(get_pagination_context(rejection.request()).is_err());
    }

    #[test]
    fn test_pagination_extractor() {
        let cases = [
            ("/", Pagination::new("30", "0")),
            ("/?offset=3&limit=34", Pagination::new("34", "3")),
            ("/?offset=34", Pagination::new("30", "34")),
            ("/?limit=20", Pagination::new("20", "0")),
            ("/?limit=&offset=", Pagination::new("30", "0")),
        ];

        let filter = filter![pagination_extractor(defaults())];
        for (uri, expected) in cases {
            let request = filter.apply(make_request(uri)).unwrap();
            assert_eq!(get_pagination_context(&request).unwrap(), &expected, "for {uri}");
        }
    }

    #[test]
    fn test_malformed_escape_treated_as_absent() {
        let filter = filter![pagination_validator(), pagination_extractor(defaults())];

        let request = filter.apply(make_request("/?limit=%zz&offset=3")).unwrap();
        assert_eq!(get_pagination_context(&request).unwrap(), &Pagination::new("30", "3"));
    }

    #[test]
    fn test_pagination_values() {
        let pagination = Pagination::new("34", "-3");
        assert_eq!(pagination.limit_value().unwrap(), 34);
        assert_eq!(pagination.offset_value().unwrap(), -3);

        let err = Pagination::new("ten", "0").limit_value().unwrap_err();
        assert_eq!(err.parameter(), Some("limit"));
    }

    #[test]
    fn test_pagination_serializes() {
        let json = serde_json::to_string(&Pagination::new("30", "0")).unwrap();
        assert_eq!(json, r#"{"limit":"30","offset":"0"}"#);
    }

    #[test]
    fn test_step_names() {
        let filter = filter![pagination_validator(), pagination_extractor(defaults())];
        assert_eq!(filter.step_names(), vec!["pagination_validator", "pagination_extractor"]);
    }

    proptest! {
        #[test]
        fn prop_extraction_is_idempotent(limit in 0u32..10_000, offset in 0u32..10_000) {
            let filter: Filter = filter![pagination_extractor(defaults())];
            let uri = format!("/?limit={limit}&offset={offset}");

            let once = filter.apply(make_request(&uri)).unwrap();
            let first = get_pagination_context(&once).unwrap().clone();
            let twice = filter.apply(once).unwrap();

            prop_assert_eq!(get_pagination_context(&twice).unwrap(), &first);
            prop_assert_eq!(first, Pagination::new(limit.to_string(), offset.to_string()));
        }

        #[test]
        fn prop_integers_always_validate(limit in any::<i64>(), offset in any::<i64>()) {
            let filter = filter![pagination_validator()];
            let uri = format!("/?limit={limit}&offset={offset}");
            prop_assert!(filter.apply(make_request(&uri)).is_ok());
        }
    }
}
