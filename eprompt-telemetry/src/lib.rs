//! Logging bootstrap for the ePrompt service.

#![warn(missing_docs, clippy::pedantic)]

mod logging;

pub use logging::{DEFAULT_LOG_DIRECTIVE, TelemetryError, TelemetryResult, build_filter, init_tracing};
