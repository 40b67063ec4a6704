//! Typed request context for extracted parameters.
//!
//! Extractors store their output in the request's extensions under private
//! slot types, one per [`ContextKind`]. Because the slot types are not
//! exported, an extension inserted by application code can never be
//! mistaken for extracted data, even if it has the same payload type.

use crate::pagination::Pagination;
use crate::sort::Sort;
use earlygrave_core::{ContextKind, FilterError, Request};

#[derive(Debug, Clone)]
struct PaginationSlot(Pagination);

#[derive(Debug, Clone)]
struct SortSlot(Sort);

/// Attaches pagination to the request, replacing any earlier value.
pub(crate) fn attach_pagination(request: &mut Request, pagination: Pagination) {
    request.extensions_mut().insert(PaginationSlot(pagination));
}

/// Attaches a sort order to the request, replacing any earlier value.
pub(crate) fn attach_sort(request: &mut Request, sort: Sort) {
    request.extensions_mut().insert(SortSlot(sort));
}

/// Returns the pagination attached by the pagination extractor.
///
/// # Errors
///
/// Returns [`FilterError::ContextNotFound`] if the request never passed
/// through the pagination extractor.
///
/// # Example
///
/// ```
/// use earlygrave_params::get_pagination_context;
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let request = http::Request::builder()
///     .uri("/?limit=10")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let err = get_pagination_context(&request).unwrap_err();
/// assert!(err.is_context_not_found());
/// ```
pub fn get_pagination_context(request: &Request) -> Result<&Pagination, FilterError> {
    request
        .extensions()
        .get::<PaginationSlot>()
        .map(|slot| &slot.0)
        .ok_or_else(|| FilterError::context_not_found(ContextKind::Pagination))
}

/// Returns the sort order attached by the sort extractor.
///
/// # Errors
///
/// Returns [`FilterError::ContextNotFound`] if the request never passed
/// through the sort extractor.
pub fn get_sort_context(request: &Request) -> Result<&Sort, FilterError> {
    request
        .extensions()
        .get::<SortSlot>()
        .map(|slot| &slot.0)
        .ok_or_else(|| FilterError::context_not_found(ContextKind::Sort))
}

/// Extension trait for reading extracted parameters off a request.
///
/// # Example
///
/// ```
/// use earlygrave_params::{pagination_extractor, Pagination, RequestParamsExt};
/// use earlygrave_core::filter;
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let filter = filter![pagination_extractor(Pagination::new("30", "0"))];
/// let request = http::Request::builder()
///     .uri("/?offset=60")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let request = filter.apply(request).unwrap();
/// let pagination = request.pagination().unwrap();
/// assert_eq!(pagination.limit, "30");
/// assert_eq!(pagination.offset, "60");
/// ```
pub trait RequestParamsExt {
    /// Returns the extracted pagination.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ContextNotFound`] when nothing was extracted.
    fn pagination(&self) -> Result<&Pagination, FilterError>;

    /// Returns the extracted sort order.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ContextNotFound`] when nothing was extracted.
    fn sort(&self) -> Result<&Sort, FilterError>;
}

impl RequestParamsExt for Request {
    fn pagination(&self) -> Result<&Pagination, FilterError> {
        get_pagination_context(self)
    }

    fn sort(&self) -> Result<&Sort, FilterError> {
        get_sort_context(self)
    }
}
