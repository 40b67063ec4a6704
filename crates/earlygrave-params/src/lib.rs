//! # Earlygrave Params
//!
//! Query-parameter filters built on [`earlygrave_core`].
//!
//! | Step | Kind | Query parameter | Rejects with |
//! |------|------|-----------------|--------------|
//! | [`pagination_validator`] | validate | `limit`, `offset` | [`FilterError::ParameterFormat`] |
//! | [`pagination_extractor`] | extract | `limit`, `offset` | never |
//! | [`sort_validator`] | validate | `sort` | [`FilterError::InvalidColumn`] |
//! | [`sort_extractor`] | extract | `sort` | never |
//! | [`choice_validator`] | validate | any | [`FilterError::InvalidChoice`] |
//!
//! Extractors attach their result to the request; handlers read it back with
//! [`get_pagination_context`] and [`get_sort_context`] (or the
//! [`RequestParamsExt`] methods), which fail with
//! [`FilterError::ContextNotFound`] when the extractor never ran.
//!
//! ## Example
//!
//! ```
//! use earlygrave_core::filter;
//! use earlygrave_params::{
//!     pagination_extractor, pagination_validator, sort_extractor, sort_validator,
//!     Pagination, RequestParamsExt, Sort, SortDirection,
//! };
//! use bytes::Bytes;
//! use http_body_util::Full;
//!
//! let filter = filter![
//!     pagination_validator(),
//!     pagination_extractor(Pagination::new("30", "0")),
//!     sort_validator(["name", "role"]),
//!     sort_extractor(Sort::new("name", SortDirection::Desc)),
//! ];
//!
//! let request = http::Request::builder()
//!     .uri("/users?limit=10&sort=-role")
//!     .body(Full::new(Bytes::new()))
//!     .unwrap();
//!
//! let request = filter.apply(request).unwrap();
//! assert_eq!(request.pagination().unwrap(), &Pagination::new("10", "0"));
//! assert_eq!(request.sort().unwrap(), &Sort::new("role", SortDirection::Desc));
//! ```

#![doc(html_root_url = "https://docs.rs/earlygrave-params/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod choice;
mod context;
mod pagination;
mod sort;

pub use choice::{choice_validator, ChoiceValidator};
pub use context::{get_pagination_context, get_sort_context, RequestParamsExt};
pub use pagination::{
    pagination_extractor, pagination_validator, Pagination, PaginationExtractor,
    PaginationValidator, LIMIT_PARAM, OFFSET_PARAM,
};
pub use sort::{
    sort_extractor, sort_validator, ParseSortDirectionError, Sort, SortDirection, SortExtractor,
    SortValidator, DESCENDING_MARKER, SORT_PARAM,
};

// Re-exported so intra-doc links and callers can name the error kinds.
pub use earlygrave_core::{ContextKind, FilterError};
