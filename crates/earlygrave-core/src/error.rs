//! Filter error types.
//!
//! [`FilterError`] classifies why a request was turned away by a filter
//! step. [`Rejection`] pairs that error with the request value as it stood
//! when the step failed.

use crate::types::Request;
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// Result type returned by filters and decorators.
pub type FilterResult = Result<Request, Rejection>;

/// The kind of derived data stored in a request's context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Pagination bounds attached by the pagination extractor.
    Pagination,
    /// Sort order attached by the sort extractor.
    Sort,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pagination => write!(f, "pagination"),
            Self::Sort => write!(f, "sort"),
        }
    }
}

/// Error produced when a filter step rejects a request.
///
/// Each variant is a distinct kind so callers can branch on it instead of
/// matching message text.
///
/// # Example
///
/// ```
/// use earlygrave_core::{ContextKind, FilterError};
///
/// let err = FilterError::invalid_column("rank");
/// assert_eq!(err.to_string(), "rank is not sortable");
///
/// let err = FilterError::context_not_found(ContextKind::Sort);
/// assert!(err.is_context_not_found());
/// assert_eq!(err.error_code(), "CONTEXT_NOT_FOUND");
/// ```
#[derive(Error, Debug)]
pub enum FilterError {
    /// A query value did not parse as the expected primitive type.
    #[error("parsing \"{value}\": {source}")]
    ParameterFormat {
        /// Name of the offending query parameter.
        parameter: String,
        /// The raw value as it appeared in the query string.
        value: String,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The requested sort column is not in the allow-list.
    #[error("{column} is not sortable")]
    InvalidColumn {
        /// The column name with any descending marker removed.
        column: String,
    },

    /// The requested value is not one of the permitted options.
    #[error("{value} is an invalid option for {parameter}")]
    InvalidChoice {
        /// Name of the query parameter.
        parameter: String,
        /// The rejected value.
        value: String,
    },

    /// A typed accessor found nothing stored for its kind.
    #[error("no {kind} was found in request context")]
    ContextNotFound {
        /// Which context entry was looked up.
        kind: ContextKind,
    },

    /// A collaborator-supplied extractor failed for its own reasons.
    #[error("extraction failed: {0}")]
    Extraction(#[from] anyhow::Error),
}

impl FilterError {
    /// Creates a parameter format error from an integer parse failure.
    #[must_use]
    pub fn parameter_format(
        parameter: impl Into<String>,
        value: impl Into<String>,
        source: ParseIntError,
    ) -> Self {
        Self::ParameterFormat {
            parameter: parameter.into(),
            value: value.into(),
            source,
        }
    }

    /// Creates an invalid sort column error.
    #[must_use]
    pub fn invalid_column(column: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
        }
    }

    /// Creates an invalid choice error.
    #[must_use]
    pub fn invalid_choice(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidChoice {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Creates a context-not-found error for the given kind.
    #[must_use]
    pub fn context_not_found(kind: ContextKind) -> Self {
        Self::ContextNotFound { kind }
    }

    /// Creates an extraction failure from a message.
    #[must_use]
    pub fn extraction(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Extraction(anyhow::Error::msg(message))
    }

    /// Returns true if an accessor found no stored entry.
    #[must_use]
    pub fn is_context_not_found(&self) -> bool {
        matches!(self, Self::ContextNotFound { .. })
    }

    /// Returns the query parameter this error refers to, if any.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::ParameterFormat { parameter, .. } | Self::InvalidChoice { parameter, .. } => {
                Some(parameter)
            }
            Self::InvalidColumn { .. } => Some("sort"),
            Self::ContextNotFound { .. } | Self::Extraction(_) => None,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ParameterFormat { .. } => "INVALID_PARAMETER_FORMAT",
            Self::InvalidColumn { .. } => "INVALID_SORT_COLUMN",
            Self::InvalidChoice { .. } => "INVALID_CHOICE",
            Self::ContextNotFound { .. } => "CONTEXT_NOT_FOUND",
            Self::Extraction(_) => "EXTRACTION_FAILED",
        }
    }
}

/// A rejected request together with the reason it was rejected.
///
/// Validation steps hand back the request exactly as they received it.
/// Extraction steps hand back whatever request their extractor returned,
/// so callers should not rely on its shape.
pub struct Rejection {
    request: Request,
    error: FilterError,
}

impl Rejection {
    /// Creates a rejection.
    #[must_use]
    pub fn new(request: Request, error: impl Into<FilterError>) -> Self {
        Self {
            request,
            error: error.into(),
        }
    }

    /// Returns the error.
    #[must_use]
    pub fn error(&self) -> &FilterError {
        &self.error
    }

    /// Returns the request at the time of failure.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Discards the request and returns the error.
    #[must_use]
    pub fn into_error(self) -> FilterError {
        self.error
    }

    /// Splits the rejection into its request and error.
    #[must_use]
    pub fn into_parts(self) -> (Request, FilterError) {
        (self.request, self.error)
    }
}

impl fmt::Debug for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejection")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for Rejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

impl From<Rejection> for FilterError {
    fn from(rejection: Rejection) -> Self {
        rejection.error
    }
}
