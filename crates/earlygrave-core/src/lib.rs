//! # Earlygrave Core
//!
//! Composable request filters for the Earlygrave query-parameter pipeline.
//!
//! A [`Filter`] is an ordered chain of [`Decorator`] steps applied to an
//! incoming [`Request`] before it reaches application code. Each step either
//! rejects the request, stopping the chain, or hands a (possibly replaced)
//! request to the next step.
//!
//! ```text
//! Request → step 1 → step 2 → … → step n → enriched Request
//!              ↓        ↓            ↓
//!          Rejection (first failure wins, later steps never run)
//! ```
//!
//! ## Building Blocks
//!
//! | Type | Role |
//! |------|------|
//! | [`Filter`] | The assembled pipeline, `Request -> Result<Request, Rejection>` |
//! | [`Decorator`] | One configuration step, wrapping the rest of the chain |
//! | [`ValidateParam`] | Adapter for non-transforming [`Validate`] checks |
//! | [`ExtractParam`] | Adapter for [`Extract`] steps that may replace the request |
//! | [`FilterError`] | Why a request was rejected, one variant per kind |
//!
//! ## Example
//!
//! ```
//! use earlygrave_core::{filter, validate_param, FilterError, QueryParams};
//! use bytes::Bytes;
//! use http_body_util::Full;
//!
//! let only_json = validate_param(|request| match QueryParams::from_request(request).get_non_empty("format") {
//!     Some(format) if format != "json" => Err(FilterError::invalid_choice("format", format)),
//!     _ => Ok(()),
//! });
//!
//! let filter = filter![only_json];
//!
//! let request = http::Request::builder()
//!     .uri("/reports?format=xml")
//!     .body(Full::new(Bytes::new()))
//!     .unwrap();
//!
//! let rejection = filter.apply(request).unwrap_err();
//! assert_eq!(rejection.to_string(), "xml is an invalid option for format");
//! ```

#![doc(html_root_url = "https://docs.rs/earlygrave-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod decorator;
mod error;
mod filter;
mod types;

pub use adapter::{extract_param, validate_param, Extract, ExtractParam, Validate, ValidateParam};
pub use decorator::{Decorator, FnDecorator, Next};
pub use error::{ContextKind, FilterError, FilterResult, Rejection};
pub use filter::{BoxedDecorator, Filter, FilterBuilder};
pub use types::{QueryParams, Request};
