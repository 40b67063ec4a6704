//! Composed filter pipeline.
//!
//! A [`Filter`] is built once from an ordered list of decorators and then
//! applied to every incoming request. Steps execute in the order they were
//! given: for `[a, b]`, `a` sees the request first and `b` sees whatever `a`
//! handed on. The first step to reject stops the chain.
//!
//! A filter with no steps is the identity: it returns its input unchanged.

use crate::decorator::{Decorator, Next};
use crate::error::FilterResult;
use crate::types::Request;
use std::fmt;
use std::sync::Arc;

/// A type-erased decorator that can be stored in a filter.
pub type BoxedDecorator = Arc<dyn Decorator>;

/// An assembled, immutable filter pipeline.
///
/// Cloning is cheap and clones share the same steps. A filter holds only
/// immutable configuration, so it can be applied from many threads at once.
///
/// # Example
///
/// ```
/// use earlygrave_core::{Filter, FnDecorator};
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let filter = Filter::builder()
///     .step(FnDecorator::new("world", |request, next| {
///         let (mut parts, body) = request.into_parts();
///         parts.uri = format!("{}/world", parts.uri).parse().unwrap();
///         next.run(http::Request::from_parts(parts, body))
///     }))
///     .build();
///
/// let request = http::Request::builder()
///     .uri("/hello")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let request = filter.apply(request).unwrap();
/// assert_eq!(request.uri(), "/hello/world");
/// ```
#[derive(Clone)]
pub struct Filter {
    steps: Arc<[BoxedDecorator]>,
}

impl Filter {
    /// Composes a filter from decorators, preserving their order.
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = BoxedDecorator>,
    {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Returns the identity filter, which passes every request through.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(std::iter::empty())
    }

    /// Creates a new filter builder.
    #[must_use]
    pub fn builder() -> FilterBuilder {
        FilterBuilder::new()
    }

    /// Runs a request through every step in order.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`](crate::Rejection) of the first step that
    /// turned the request away. Later steps do not run.
    pub fn apply(&self, request: Request) -> FilterResult {
        Next::new(&self.steps).run(request)
    }

    /// Returns the names of all steps in execution order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromIterator<BoxedDecorator> for Filter {
    fn from_iter<I: IntoIterator<Item = BoxedDecorator>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("steps", &self.step_names())
            .finish()
    }
}

/// Builder for constructing a [`Filter`].
///
/// Steps run in the order they are added.
#[derive(Default)]
pub struct FilterBuilder {
    steps: Vec<BoxedDecorator>,
}

impl FilterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decorator.
    #[must_use]
    pub fn step<D: Decorator>(mut self, decorator: D) -> Self {
        self.steps.push(Arc::new(decorator));
        self
    }

    /// Appends an already shared decorator.
    #[must_use]
    pub fn boxed_step(mut self, decorator: BoxedDecorator) -> Self {
        self.steps.push(decorator);
        self
    }

    /// Appends several shared decorators, keeping their order.
    #[must_use]
    pub fn steps<I>(mut self, decorators: I) -> Self
    where
        I: IntoIterator<Item = BoxedDecorator>,
    {
        self.steps.extend(decorators);
        self
    }

    /// Builds the filter.
    #[must_use]
    pub fn build(self) -> Filter {
        Filter::new(self.steps)
    }
}

/// Composes a [`Filter`] from decorators listed in execution order.
///
/// `filter![a, b]` is shorthand for
/// `Filter::builder().step(a).step(b).build()`; `filter![]` is the identity.
///
/// # Example
///
/// ```
/// use earlygrave_core::{filter, FnDecorator};
///
/// let f = filter![
///     FnDecorator::new("first", |request, next| next.run(request)),
///     FnDecorator::new("second", |request, next| next.run(request)),
/// ];
/// assert_eq!(f.step_names(), vec!["first", "second"]);
/// ```
#[macro_export]
macro_rules! filter {
    () => {
        $crate::Filter::identity()
    };
    ($($step:expr),+ $(,)?) => {
        $crate::Filter::builder()
            $(.step($step))+
            .build()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::FnDecorator;
    use crate::error::{FilterError, Rejection};
    use bytes::Bytes;
    use http::Method;
    use http_body_util::Full;
    use proptest::prelude::*;

    fn make_request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    /// Rewrites the method to HEAD, keeping URL and body.
    fn head_decorator() -> FnDecorator<impl Fn(Request, Next<'_>) -> FilterResult + Send + Sync> {
        FnDecorator::new("head", |request, next| {
            let (mut parts, body) = request.into_parts();
            parts.method = Method::HEAD;
            next.run(http::Request::from_parts(parts, body))
        })
    }

    /// Appends `/world` to the URL, keeping method and body.
    fn world_decorator() -> FnDecorator<impl Fn(Request, Next<'_>) -> FilterResult + Send + Sync> {
        FnDecorator::new("world", |request, next| {
            let (mut parts, body) = request.into_parts();
            parts.uri = format!("{}/world", parts.uri).parse().unwrap();
            next.run(http::Request::from_parts(parts, body))
        })
    }

    /// Appends `/{segment}` to the URL path.
    fn segment_decorator(segment: u8) -> BoxedDecorator {
        Arc::new(FnDecorator::new("segment", move |request, next| {
            let (mut parts, body) = request.into_parts();
            parts.uri = format!("{}/{segment}", parts.uri).parse().unwrap();
            next.run(http::Request::from_parts(parts, body))
        }))
    }

    fn failing_decorator() -> BoxedDecorator {
        Arc::new(FnDecorator::new("fail", |request, _next| {
            Err(Rejection::new(request, FilterError::extraction("Oops!")))
        }))
    }

    #[test]
    fn test_composition_order() {
        let filter = Filter::builder()
            .step(world_decorator())
            .step(head_decorator())
            .build();

        let request = filter.apply(make_request(Method::GET, "/hello")).unwrap();

        assert_eq!(request.uri(), "/hello/world");
        assert_eq!(request.method(), Method::HEAD);
        assert_eq!(filter.step_names(), vec!["world", "head"]);
    }

    #[test]
    fn test_filter_macro_matches_builder() {
        let filter = filter![world_decorator(), head_decorator()];

        let request = filter.apply(make_request(Method::GET, "/hello")).unwrap();

        assert_eq!(request.uri(), "/hello/world");
        assert_eq!(request.method(), Method::HEAD);
    }

    #[test]
    fn test_identity_filter() {
        let filter = Filter::identity();
        assert_eq!(filter.step_count(), 0);

        let request = filter.apply(make_request(Method::POST, "/items?x=1")).unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri(), "/items?x=1");
    }

    #[test]
    fn test_empty_macro_is_identity() {
        let filter: Filter = filter![];
        assert_eq!(filter.step_count(), 0);
    }

    #[test]
    fn test_short_circuit_returns_request_at_failure() {
        let filter = Filter::new(vec![
            segment_decorator(1),
            failing_decorator(),
            segment_decorator(2),
        ]);

        let rejection = filter.apply(make_request(Method::GET, "/a")).unwrap_err();

        assert_eq!(rejection.request().uri(), "/a/1");
        assert_eq!(rejection.error().to_string(), "extraction failed: Oops!");
    }

    #[test]
    fn test_from_iterator() {
        let filter: Filter = (1..=3).map(segment_decorator).collect();
        assert_eq!(filter.step_count(), 3);

        let request = filter.apply(make_request(Method::GET, "/r")).unwrap();
        assert_eq!(request.uri(), "/r/1/2/3");
    }

    #[test]
    fn test_clone_shares_steps() {
        let filter = Filter::new(vec![segment_decorator(7)]);
        let cloned = filter.clone();

        let a = filter.apply(make_request(Method::GET, "/x")).unwrap();
        let b = cloned.apply(make_request(Method::GET, "/x")).unwrap();
        assert_eq!(a.uri(), b.uri());
    }

    #[test]
    fn test_concurrent_apply() {
        let filter = Filter::new(vec![segment_decorator(1), segment_decorator(2)]);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let filter = filter.clone();
                std::thread::spawn(move || {
                    let uri = format!("/t{i}");
                    let request = filter.apply(make_request(Method::GET, &uri)).unwrap();
                    assert_eq!(request.uri().to_string(), format!("/t{i}/1/2"));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_debug_lists_step_names() {
        let filter = filter![head_decorator()];
        assert_eq!(format!("{filter:?}"), r#"Filter { steps: ["head"] }"#);
    }

    proptest! {
        #[test]
        fn prop_steps_run_left_to_right(segments in proptest::collection::vec(0u8..100, 0..12)) {
            let filter: Filter = segments.iter().copied().map(segment_decorator).collect();

            let request = filter.apply(make_request(Method::GET, "/root")).unwrap();

            let expected: String = segments.iter().map(|s| format!("/{s}")).collect();
            prop_assert_eq!(request.uri().to_string(), format!("/root{expected}"));
        }

        #[test]
        fn prop_no_step_runs_after_failure(
            before in proptest::collection::vec(0u8..100, 0..6),
            after in proptest::collection::vec(0u8..100, 1..6),
        ) {
            let steps = before
                .iter()
                .copied()
                .map(segment_decorator)
                .chain(std::iter::once(failing_decorator()))
                .chain(after.iter().copied().map(segment_decorator));
            let filter = Filter::new(steps);

            let rejection = filter.apply(make_request(Method::GET, "/root")).unwrap_err();

            let expected: String = before.iter().map(|s| format!("/{s}")).collect();
            prop_assert_eq!(rejection.request().uri().to_string(), format!("/root{expected}"));
        }
    }
}
