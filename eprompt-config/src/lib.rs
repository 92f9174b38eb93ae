//! Settings for the ePrompt service.
//!
//! [`Settings`] is read from environment variables. Loading goes through an
//! injectable lookup so tests never touch the process environment.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{LogFormat, Settings};
