//! Typed configuration for Earlygrave filter pipelines.
//!
//! A route's standard query-parameter steps are usually the same few
//! choices: page size defaults, which columns may be sorted, which
//! enumerated parameters to check. This crate lets those choices live in a
//! file instead of code:
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (fails on unknown fields)
//! - Layered loading (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [pagination]
//! enabled = true
//! default_limit = 30
//! default_offset = 0
//!
//! [sort]
//! enabled = true
//! columns = ["name", "role", "created_at"]
//! default_column = "created_at"
//! default_direction = "DESC"
//!
//! [[choices]]
//! parameter = "currency"
//! options = ["USD", "NIS"]
//!
//! [logging]
//! level = "info"
//! json_format = true
//! ```
//!
//! # Example
//!
//! ```no_run
//! use earlygrave_config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_file("filters.toml")?
//!     .with_env_prefix("EARLYGRAVE")
//!     .load()?;
//!
//! earlygrave_telemetry::init_logging(&config.logging)?;
//! let filter = config.build_filter();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{ChoiceConfig, FilterConfig, PaginationConfig, SortConfig};
pub use error::ConfigError;
pub use loader::ConfigLoader;
