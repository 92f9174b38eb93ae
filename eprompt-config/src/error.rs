use thiserror::Error;

/// Result alias for settings loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held a value that could not be used.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Convenience constructor for rejected values.
    #[must_use]
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
