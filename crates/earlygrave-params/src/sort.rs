//! Sort order from the `sort` query parameter.
//!
//! `?sort=name` sorts ascending by `name`; a leading `-` (`?sort=-name`)
//! sorts descending. [`sort_validator`] restricts the column to an
//! allow-list and [`sort_extractor`] attaches the resulting [`Sort`].

use crate::context::attach_sort;
use earlygrave_core::{
    Extract, ExtractParam, FilterError, FilterResult, QueryParams, Request, Validate,
    ValidateParam,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query parameter holding the sort column.
pub const SORT_PARAM: &str = "sort";

/// Prefix marking a descending sort.
pub const DESCENDING_MARKER: char = '-';

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the SQL-style keyword, `"ASC"` or `"DESC"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortDirectionError(String);

impl fmt::Display for ParseSortDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort direction '{}': expected ASC or DESC", self.0)
    }
}

impl std::error::Error for ParseSortDirectionError {}

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(ParseSortDirectionError(s.to_string()))
        }
    }
}

/// Sort order for a list request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// Column to sort by.
    pub column: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Sort {
    /// Creates a sort order.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Parses a raw `sort` value such as `name` or `-name`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.strip_prefix(DESCENDING_MARKER) {
            Some(column) => Self::new(column, SortDirection::Desc),
            None => Self::new(value, SortDirection::Asc),
        }
    }
}

/// Checks that the requested sort column is allowed.
#[derive(Debug, Clone)]
pub struct SortValidator {
    columns: Vec<String>,
}

impl SortValidator {
    /// Creates a validator allowing the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the allowed columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if `column` may be sorted on.
    #[must_use]
    pub fn is_sortable(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

impl Validate for SortValidator {
    fn name(&self) -> &'static str {
        "sort_validator"
    }

    fn validate(&self, request: &Request) -> Result<(), FilterError> {
        let params = QueryParams::from_request(request);
        let Some(value) = params.get_non_empty(SORT_PARAM) else {
            return Ok(());
        };

        let column = value.strip_prefix(DESCENDING_MARKER).unwrap_or(value);
        if self.is_sortable(column) {
            Ok(())
        } else {
            Err(FilterError::invalid_column(column))
        }
    }
}

/// Attaches the requested sort order, or a default.
#[derive(Debug, Clone)]
pub struct SortExtractor {
    default: Sort,
}

impl SortExtractor {
    /// Creates an extractor falling back to `default`.
    #[must_use]
    pub fn new(default: Sort) -> Self {
        Self { default }
    }

    /// Returns the default sort order.
    #[must_use]
    pub fn default_sort(&self) -> &Sort {
        &self.default
    }

    /// Builds the sort order for a request without attaching it.
    #[must_use]
    pub fn resolve(&self, params: &QueryParams) -> Sort {
        params
            .get_non_empty(SORT_PARAM)
            .map_or_else(|| self.default.clone(), Sort::parse)
    }
}

impl Extract for SortExtractor {
    fn name(&self) -> &'static str {
        "sort_extractor"
    }

    fn extract(&self, mut request: Request) -> FilterResult {
        let sort = self.resolve(&QueryParams::from_request(&request));
        tracing::trace!(column = %sort.column, direction = %sort.direction, "extracted sort");
        attach_sort(&mut request, sort);
        Ok(request)
    }
}

/// Returns a step rejecting sort columns outside `columns`.
///
/// # Example
///
/// ```
/// use earlygrave_params::sort_validator;
/// use earlygrave_core::filter;
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let filter = filter![sort_validator(["name", "role"])];
/// let request = http::Request::builder()
///     .uri("/?sort=-rank")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let rejection = filter.apply(request).unwrap_err();
/// assert_eq!(rejection.to_string(), "rank is not sortable");
/// ```
pub fn sort_validator<I, S>(columns: I) -> ValidateParam<SortValidator>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ValidateParam::new(SortValidator::new(columns))
}

/// Returns a step attaching [`Sort`] to every request.
///
/// Never rejects.
#[must_use]
pub fn sort_extractor(default: Sort) -> ExtractParam<SortExtractor> {
    ExtractParam::new(SortExtractor::new(default))
}
