//! Filter configuration types.
//!
//! [`FilterConfig`] describes which standard query-parameter steps a route
//! uses and their defaults. [`FilterConfig::build_filter`] turns it into a
//! ready [`Filter`].

use earlygrave_core::Filter;
use earlygrave_params::{
    choice_validator, pagination_extractor, pagination_validator, sort_extractor, sort_validator,
    Pagination, Sort, SortDirection,
};
use earlygrave_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Complete filter configuration.
///
/// # Example
///
/// ```
/// use earlygrave_config::FilterConfig;
///
/// let config = FilterConfig::default();
/// assert_eq!(config.pagination.default_limit, 30);
/// assert_eq!(config.build_filter().step_names(), vec!["pagination_validator", "pagination_extractor"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Pagination steps.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Sort steps.
    #[serde(default)]
    pub sort: SortConfig,

    /// One choice validator per entry.
    #[serde(default)]
    pub choices: Vec<ChoiceConfig>,

    /// Logging setup.
    #[serde(default)]
    pub logging: LogConfig,
}

/// `[pagination]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Add the pagination validator and extractor.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Limit used when the request has none.
    #[serde(default = "default_limit")]
    pub default_limit: i64,

    /// Offset used when the request has none.
    #[serde(default)]
    pub default_offset: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_limit: default_limit(),
            default_offset: 0,
        }
    }
}

impl PaginationConfig {
    /// Returns the defaults as extracted [`Pagination`].
    #[must_use]
    pub fn defaults(&self) -> Pagination {
        Pagination::new(self.default_limit.to_string(), self.default_offset.to_string())
    }
}

/// `[sort]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    /// Add the sort validator and extractor.
    #[serde(default)]
    pub enabled: bool,

    /// Sortable columns.
    #[serde(default)]
    pub columns: Vec<String>,

    /// Column used when the request has no `sort`.
    #[serde(default)]
    pub default_column: String,

    /// Direction used with `default_column`.
    #[serde(default = "default_direction")]
    pub default_direction: SortDirection,
}

impl SortConfig {
    /// Returns the default as extracted [`Sort`].
    #[must_use]
    pub fn default_sort(&self) -> Sort {
        Sort::new(self.default_column.clone(), self.default_direction)
    }
}

/// One `[[choices]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceConfig {
    /// Query parameter to check.
    pub parameter: String,

    /// Accepted values.
    pub options: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_limit() -> i64 {
    30
}

fn default_direction() -> SortDirection {
    SortDirection::default()
}

impl FilterConfig {
    /// Create a development preset with human-readable debug logging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development(),
            ..Self::default()
        }
    }

    /// Create a production preset with JSON logging.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LogConfig::production(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `pagination.default_limit` is not positive or the offset is negative
    /// - sort is enabled without columns or a default column, or the default
    ///   column is not one of the columns
    /// - a choice has no parameter name or no options
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.default_limit <= 0 {
            return Err(ConfigError::invalid_value(
                "pagination.default_limit",
                format!("must be positive, got {}", self.pagination.default_limit),
            ));
        }

        if self.pagination.default_offset < 0 {
            return Err(ConfigError::invalid_value(
                "pagination.default_offset",
                format!("must not be negative, got {}", self.pagination.default_offset),
            ));
        }

        if self.sort.enabled {
            if self.sort.default_column.is_empty() {
                return Err(ConfigError::invalid_value(
                    "sort.default_column",
                    "must be set when sort is enabled",
                ));
            }

            if self.sort.columns.is_empty() {
                return Err(ConfigError::invalid_value(
                    "sort.columns",
                    "must list at least one column when sort is enabled",
                ));
            }

            if !self.sort.columns.contains(&self.sort.default_column) {
                return Err(ConfigError::invalid_value(
                    "sort.default_column",
                    format!("{} is not one of sort.columns", self.sort.default_column),
                ));
            }
        }

        for (index, choice) in self.choices.iter().enumerate() {
            if choice.parameter.is_empty() {
                return Err(ConfigError::invalid_value(
                    format!("choices[{index}].parameter"),
                    "must not be empty",
                ));
            }
            if choice.options.is_empty() {
                return Err(ConfigError::invalid_value(
                    format!("choices[{index}].options"),
                    format!("no options given for {}", choice.parameter),
                ));
            }
        }

        if !self.logging.has_valid_level() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("invalid filter directive: {}", self.logging.level),
            ));
        }

        Ok(())
    }

    /// Assemble the configured steps into a filter.
    ///
    /// Steps are added in a fixed order: pagination validator, pagination
    /// extractor, sort validator, sort extractor, then each choice validator
    /// in the order listed.
    ///
    /// # Example
    ///
    /// ```
    /// use earlygrave_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(r#"
    ///         [sort]
    ///         enabled = true
    ///         columns = ["name", "role"]
    ///         default_column = "name"
    ///
    ///         [[choices]]
    ///         parameter = "currency"
    ///         options = ["USD", "NIS"]
    ///     "#, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.build_filter().step_count(), 5);
    /// ```
    #[must_use]
    pub fn build_filter(&self) -> Filter {
        let mut builder = Filter::builder();

        if self.pagination.enabled {
            builder = builder
                .step(pagination_validator())
                .step(pagination_extractor(self.pagination.defaults()));
        }

        if self.sort.enabled {
            builder = builder
                .step(sort_validator(self.sort.columns.iter().cloned()))
                .step(sort_extractor(self.sort.default_sort()));
        }

        for choice in &self.choices {
            builder = builder.step(choice_validator(
                choice.parameter.clone(),
                choice.options.iter().cloned(),
            ));
        }

        let filter = builder.build();
        tracing::debug!(steps = ?filter.step_names(), "built filter from configuration");
        filter
    }
}
