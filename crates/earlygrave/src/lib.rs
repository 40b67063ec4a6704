//! # Earlygrave
//!
//! Composable request filters that validate and extract common query
//! parameters before a request reaches its handler.
//!
//! ## Quick Start
//!
//! ```
//! use earlygrave::prelude::*;
//! use bytes::Bytes;
//! use http_body_util::Full;
//!
//! let filter = filter![
//!     pagination_validator(),
//!     pagination_extractor(Pagination::new("30", "0")),
//!     sort_validator(["name", "role"]),
//!     sort_extractor(Sort::new("name", SortDirection::Asc)),
//!     choice_validator("currency", ["USD", "NIS"]),
//! ];
//!
//! let request = http::Request::builder()
//!     .uri("/users?limit=5&sort=-role&currency=USD")
//!     .body(Full::new(Bytes::new()))
//!     .unwrap();
//!
//! match filter.apply(request) {
//!     Ok(request) => {
//!         let page = request.pagination().unwrap();
//!         assert_eq!(page.limit_value().unwrap(), 5);
//!         assert_eq!(request.sort().unwrap().direction, SortDirection::Desc);
//!     }
//!     Err(rejection) => panic!("rejected: {rejection}"),
//! }
//! ```
//!
//! ## Architecture
//!
//! Steps run left to right; the first rejection stops the chain:
//!
//! ```text
//! Request → pagination_validator → pagination_extractor → sort_validator → … → Request
//!                    ↓                                           ↓
//!               Rejection                                   Rejection
//! ```
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`core`] | [`Filter`](core::Filter), decorators, adapters, errors |
//! | [`params`] | pagination, sort and choice steps, context accessors |
//! | [`config`] | file and environment driven [`FilterConfig`](config::FilterConfig) |
//! | [`telemetry`] | logging setup |

#![doc(html_root_url = "https://docs.rs/earlygrave/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use earlygrave_core as core;

// Re-export standard steps
pub use earlygrave_params as params;

// Re-export configuration
pub use earlygrave_config as config;

// Re-export logging setup
pub use earlygrave_telemetry as telemetry;

pub use earlygrave_core::filter;

/// Prelude module for convenient imports.
///
/// ```
/// use earlygrave::prelude::*;
/// ```
pub mod prelude {
    pub use earlygrave_core::{
        extract_param, filter, validate_param, ContextKind, Decorator, Extract, ExtractParam,
        Filter, FilterError, FilterResult, FnDecorator, Next, QueryParams, Rejection, Request,
        Validate, ValidateParam,
    };

    pub use earlygrave_params::{
        choice_validator, get_pagination_context, get_sort_context, pagination_extractor,
        pagination_validator, sort_extractor, sort_validator, Pagination, RequestParamsExt, Sort,
        SortDirection,
    };

    pub use earlygrave_config::{ConfigLoader, FilterConfig};

    pub use earlygrave_telemetry::{init_logging, LogConfig};
}
