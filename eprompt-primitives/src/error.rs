//! Shared error definitions for ePrompt primitives.

use thiserror::Error;

/// Result alias used throughout the prompt engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating primitive types.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A model configuration value fell outside its accepted range.
    #[error("invalid model config `{field}`: {reason}")]
    InvalidModelConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The provider name is not one of the supported providers.
    #[error("unknown provider `{0}`")]
    UnknownProvider(String),
}

impl Error {
    /// Convenience constructor for model configuration failures.
    #[must_use]
    pub fn invalid_model_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidModelConfig {
            field,
            reason: reason.into(),
        }
    }
}
