//! Structured logging for Earlygrave filter pipelines.
//!
//! The filter chain reports what it does through `tracing` events. This
//! crate wires those events to stdout with a [`LogConfig`]:
//!
//! - **JSON** output for production, one object per event
//! - **Pretty** output for development, with file and line
//! - `EnvFilter` directives, so `earlygrave_core=trace` shows every step
//!
//! # Example
//!
//! ```rust,no_run
//! use earlygrave_telemetry::{init_logging, LogConfig};
//!
//! # fn main() -> earlygrave_telemetry::TelemetryResult<()> {
//! init_logging(&LogConfig::production())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LOG_LEVELS};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
