use eprompt_config::LogFormat;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_DIRECTIVE: &str = "eprompt=info,info";

/// Result alias for logging setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    Filter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {reason}")]
    Install {
        /// Underlying error message.
        reason: String,
    },
}

/// Builds the event filter: `RUST_LOG` when it parses, `fallback` otherwise.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] if `fallback` is needed and invalid.
pub fn build_filter(fallback: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(fallback).map_err(|err| TelemetryError::Filter {
            directive: fallback.to_owned(),
            reason: err.to_string(),
        })
    })
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(format: LogFormat, fallback_directive: &str) -> TelemetryResult<()> {
    let filter = build_filter(fallback_directive)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    installed.map_err(|err| TelemetryError::Install {
        reason: err.to_string(),
    })?;
    tracing::debug!(format = %format, "tracing initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_fallback_directive() {
        // Only meaningful when RUST_LOG does not already supply a filter.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_filter("eprompt=notalevel").expect_err("invalid directive");
        assert!(matches!(err, TelemetryError::Filter { .. }));
    }

    #[test]
    fn default_directive_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_DIRECTIVE).is_ok());
    }

    #[test]
    fn second_install_fails() {
        let first = init_tracing(LogFormat::Pretty, DEFAULT_LOG_DIRECTIVE);
        let second = init_tracing(LogFormat::Json, DEFAULT_LOG_DIRECTIVE);
        assert!(first.is_ok() || matches!(first, Err(TelemetryError::Install { .. })));
        assert!(matches!(second, Err(TelemetryError::Install { .. })));
    }
}
