//! Adapters that turn checks and extractors into decorators.
//!
//! - [`ValidateParam`] wraps a [`Validate`] check. The request is never
//!   modified: on success the original is handed on, on failure the original
//!   is returned inside the rejection.
//! - [`ExtractParam`] wraps an [`Extract`] transform. On success the
//!   extractor's output replaces the request for the rest of the chain; on
//!   failure the extractor's own rejection is returned untouched.

use crate::decorator::{Decorator, Next};
use crate::error::{FilterError, FilterResult, Rejection};
use crate::types::Request;

/// A non-transforming check over a request.
///
/// Closures of the form `Fn(&Request) -> Result<(), FilterError>` implement
/// this trait; use [`validate_param`] to wrap one.
pub trait Validate: Send + Sync + 'static {
    /// Returns the name reported for the wrapping decorator.
    fn name(&self) -> &'static str {
        "validate"
    }

    /// Checks the request.
    ///
    /// # Errors
    ///
    /// Returns the reason the request is not acceptable.
    fn validate(&self, request: &Request) -> Result<(), FilterError>;
}

impl<F> Validate for F
where
    F: Fn(&Request) -> Result<(), FilterError> + Send + Sync + 'static,
{
    fn validate(&self, request: &Request) -> Result<(), FilterError> {
        self(request)
    }
}

/// A transforming step that may attach derived data to a request.
///
/// Closures of the form `Fn(Request) -> FilterResult` implement this trait;
/// use [`extract_param`] to wrap one.
pub trait Extract: Send + Sync + 'static {
    /// Returns the name reported for the wrapping decorator.
    fn name(&self) -> &'static str {
        "extract"
    }

    /// Produces the request the rest of the chain should see.
    ///
    /// # Errors
    ///
    /// Returns a rejection carrying whichever request the extractor chooses
    /// to hand back.
    fn extract(&self, request: Request) -> FilterResult;
}

impl<F> Extract for F
where
    F: Fn(Request) -> FilterResult + Send + Sync + 'static,
{
    fn extract(&self, request: Request) -> FilterResult {
        self(request)
    }
}

/// Decorator running a [`Validate`] check before the rest of the chain.
#[derive(Debug, Clone)]
pub struct ValidateParam<V> {
    validator: V,
}

impl<V: Validate> ValidateParam<V> {
    /// Wraps a validator.
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    /// Returns the wrapped validator.
    pub fn validator(&self) -> &V {
        &self.validator
    }
}

impl<V: Validate> Decorator for ValidateParam<V> {
    fn name(&self) -> &'static str {
        self.validator.name()
    }

    fn process(&self, request: Request, next: Next<'_>) -> FilterResult {
        if let Err(error) = self.validator.validate(&request) {
            tracing::debug!(
                step = self.validator.name(),
                code = error.error_code(),
                error = %error,
                "request rejected by validator"
            );
            return Err(Rejection::new(request, error));
        }
        next.run(request)
    }
}

/// Decorator running an [`Extract`] step before the rest of the chain.
#[derive(Debug, Clone)]
pub struct ExtractParam<E> {
    extractor: E,
}

impl<E: Extract> ExtractParam<E> {
    /// Wraps an extractor.
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Returns the wrapped extractor.
    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}

impl<E: Extract> Decorator for ExtractParam<E> {
    fn name(&self) -> &'static str {
        self.extractor.name()
    }

    fn process(&self, request: Request, next: Next<'_>) -> FilterResult {
        match self.extractor.extract(request) {
            Ok(extracted) => next.run(extracted),
            Err(rejection) => {
                tracing::debug!(
                    step = self.extractor.name(),
                    code = rejection.error().error_code(),
                    error = %rejection.error(),
                    "request rejected by extractor"
                );
                Err(rejection)
            }
        }
    }
}

/// Wraps a validation closure into a decorator.
///
/// # Example
///
/// ```
/// use earlygrave_core::{validate_param, Filter, FilterError};
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let filter = Filter::builder()
///     .step(validate_param(|request| {
///         if request.uri().query().is_some() {
///             Err(FilterError::invalid_choice("query", "any"))
///         } else {
///             Ok(())
///         }
///     }))
///     .build();
///
/// let request = http::Request::builder()
///     .uri("/?a=1")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
/// assert!(filter.apply(request).is_err());
/// ```
pub fn validate_param<F>(validate: F) -> ValidateParam<F>
where
    F: Fn(&Request) -> Result<(), FilterError> + Send + Sync + 'static,
{
    ValidateParam::new(validate)
}

/// Wraps an extraction closure into a decorator.
///
/// # Example
///
/// ```
/// use earlygrave_core::{extract_param, Filter};
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// #[derive(Clone)]
/// struct Tenant(&'static str);
///
/// let filter = Filter::builder()
///     .step(extract_param(|mut request| {
///         request.extensions_mut().insert(Tenant("acme"));
///         Ok(request)
///     }))
///     .build();
///
/// let request = http::Request::builder()
///     .uri("/")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
/// let request = filter.apply(request).unwrap();
/// assert_eq!(request.extensions().get::<Tenant>().map(|t| t.0), Some("acme"));
/// ```
pub fn extract_param<F>(extract: F) -> ExtractParam<F>
where
    F: Fn(Request) -> FilterResult + Send + Sync + 'static,
{
    ExtractParam::new(extract)
}
