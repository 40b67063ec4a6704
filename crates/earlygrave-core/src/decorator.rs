//! Core decorator trait and chain cursor.
//!
//! A [`Decorator`] is one configuration step of a filter. It receives the
//! request together with a [`Next`] cursor over the remaining steps and
//! either rejects the request or hands a (possibly replaced) request on.
//!
//! # Example
//!
//! ```
//! use earlygrave_core::{Decorator, FilterResult, Next, Request};
//!
//! struct Noop;
//!
//! impl Decorator for Noop {
//!     fn name(&self) -> &'static str {
//!         "noop"
//!     }
//!
//!     fn process(&self, request: Request, next: Next<'_>) -> FilterResult {
//!         next.run(request)
//!     }
//! }
//! ```

use crate::error::FilterResult;
use crate::filter::BoxedDecorator;
use crate::types::Request;

/// A single step in a filter chain.
///
/// # Invariants
///
/// - A decorator either returns `Err` or calls `next.run()` exactly once
/// - A decorator that returns `Err` stops the chain; no later step runs
/// - Decorators are shared between concurrent invocations and must not
///   hold per-request mutable state
pub trait Decorator: Send + Sync + 'static {
    /// Returns the name of this step, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Processes the request and continues the chain through `next`.
    fn process(&self, request: Request, next: Next<'_>) -> FilterResult;
}

/// Cursor over the steps that have not run yet.
///
/// Consumed by [`Next::run`] so the rest of the chain runs at most once.
/// When no steps remain, running it returns the request unchanged.
pub struct Next<'a> {
    remaining: &'a [BoxedDecorator],
}

impl<'a> Next<'a> {
    pub(crate) fn new(remaining: &'a [BoxedDecorator]) -> Self {
        Self { remaining }
    }

    /// Runs the remaining steps in order.
    pub fn run(self, request: Request) -> FilterResult {
        match self.remaining.split_first() {
            Some((step, rest)) => {
                tracing::trace!(step = step.name(), remaining = rest.len(), "running filter step");
                step.process(request, Next::new(rest))
            }
            None => Ok(request),
        }
    }

    /// Returns how many steps are still to run.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

/// A decorator built from a closure.
///
/// # Example
///
/// ```
/// use earlygrave_core::{Filter, FnDecorator};
/// use http::Method;
///
/// let to_head = FnDecorator::new("to_head", |mut request, next| {
///     *request.method_mut() = Method::HEAD;
///     next.run(request)
/// });
///
/// let filter = Filter::builder().step(to_head).build();
/// assert_eq!(filter.step_names(), vec!["to_head"]);
/// ```
pub struct FnDecorator<F> {
    name: &'static str,
    func: F,
}

impl<F> FnDecorator<F>
where
    F: Fn(Request, Next<'_>) -> FilterResult + Send + Sync + 'static,
{
    /// Creates a new closure-based decorator.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Decorator for FnDecorator<F>
where
    F: Fn(Request, Next<'_>) -> FilterResult + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process(&self, request: Request, next: Next<'_>) -> FilterResult {
        (self.func)(request, next)
    }
}

impl<F> std::fmt::Debug for FnDecorator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDecorator").field("name", &self.name).finish()
    }
}
