//! Enumerated-choice validation for a named query parameter.

use earlygrave_core::{FilterError, QueryParams, Request, Validate, ValidateParam};
use std::collections::BTreeSet;

/// Checks that a query parameter, when given, is one of a fixed set.
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
    parameter: String,
    options: BTreeSet<String>,
}

impl ChoiceValidator {
    /// Creates a validator for `parameter` accepting `options`.
    pub fn new<I, S>(parameter: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameter: parameter.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Returns the accepted options.
    #[must_use]
    pub fn options(&self) -> &BTreeSet<String> {
        &self.options
    }
}

impl Validate for ChoiceValidator {
    fn name(&self) -> &'static str {
        "choice_validator"
    }

    fn validate(&self, request: &Request) -> Result<(), FilterError> {
        match QueryParams::from_request(request).get_non_empty(&self.parameter) {
            Some(value) if !self.options.contains(value) => {
                Err(FilterError::invalid_choice(&self.parameter, value))
            }
            _ => Ok(()),
        }
    }
}

/// Returns a step rejecting values of `parameter` outside `options`.
///
/// Absent or empty values pass. Matching is exact and case-sensitive.
///
/// # Example
///
/// ```
/// use earlygrave_params::choice_validator;
/// use earlygrave_core::filter;
/// use bytes::Bytes;
/// use http_body_util::Full;
///
/// let filter = filter![choice_validator("currency", ["USD", "NIS"])];
/// let request = http::Request::builder()
///     .uri("/?currency=BLA")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let rejection = filter.apply(request).unwrap_err();
/// assert_eq!(rejection.to_string(), "BLA is an invalid option for currency");
/// ```
pub fn choice_validator<I, S>(parameter: impl Into<String>, options: I) -> ValidateParam<ChoiceValidator>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ValidateParam::new(ChoiceValidator::new(parameter, options))
}
