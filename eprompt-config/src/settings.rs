use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

const DEFAULT_PROJECT_NAME: &str = "ePrompt Backend API";
const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8001;
const DEFAULT_OPENAI_API_HOST: &str = "https://api.openai.com/v1";

/// Output format for log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Returns the variable value that selects this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::invalid(
                "LOG_FORMAT",
                format!("expected `pretty` or `json`, got `{other}`"),
            )),
        }
    }
}

/// Service settings.
///
/// | Variable | Default |
/// |---|---|
/// | `PROJECT_NAME` | `ePrompt Backend API` |
/// | `API_V1_STR` | `/api/v1` |
/// | `HOST` | `0.0.0.0` |
/// | `PORT` | `8001` |
/// | `OPENAI_API_KEY` | unset |
/// | `OPENAI_API_HOST` | `https://api.openai.com/v1` |
/// | `DATABASE_URL` | unset |
/// | `LOG_FORMAT` | `pretty` |
///
/// Empty variables count as unset. `DATABASE_URL` is accepted for
/// compatibility with existing deployments and otherwise ignored.
///
/// # Examples
///
/// ```
/// use eprompt_config::Settings;
///
/// let settings = Settings::from_lookup(|key| match key {
///     "PORT" => Some("9000".to_owned()),
///     _ => None,
/// })?;
/// assert_eq!(settings.port, 9000);
/// assert_eq!(settings.api_prefix, "/api/v1");
/// # Ok::<(), eprompt_config::ConfigError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Service name reported by the root and health routes.
    pub project_name: String,
    /// Prefix under which the versioned routes are mounted.
    pub api_prefix: String,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Server-wide `OpenAI` key.
    pub openai_api_key: Option<String>,
    /// Base URL of the `OpenAI` API.
    pub openai_api_host: String,
    /// Accepted but unused.
    pub database_url: Option<String>,
    /// Log line format.
    pub log_format: LogFormat,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("project_name", &self.project_name)
            .field("api_prefix", &self.api_prefix)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_api_host", &self.openai_api_host)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            openai_api_key: None,
            openai_api_host: DEFAULT_OPENAI_API_HOST.to_owned(),
            database_url: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable variable.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable variable.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let settings = Self {
            project_name: var("PROJECT_NAME").unwrap_or(defaults.project_name),
            api_prefix: var("API_V1_STR")
                .map(|prefix| parse_api_prefix(&prefix))
                .transpose()?
                .unwrap_or(defaults.api_prefix),
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT")
                .map(|port| parse_port(&port))
                .transpose()?
                .unwrap_or(defaults.port),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_api_host: var("OPENAI_API_HOST")
                .map(|host| parse_api_host(&host))
                .transpose()?
                .unwrap_or(defaults.openai_api_host),
            database_url: var("DATABASE_URL"),
            log_format: var("LOG_FORMAT")
                .map(|format| format.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        };
        Ok(settings)
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(value: &str) -> ConfigResult<u16> {
    match value.parse::<u16>() {
        Ok(0) => Err(ConfigError::invalid("PORT", "must be between 1 and 65535")),
        Ok(port) => Ok(port),
        Err(err) => Err(ConfigError::invalid("PORT", format!("`{value}`: {err}"))),
    }
}

fn parse_api_prefix(value: &str) -> ConfigResult<String> {
    if !value.starts_with('/') {
        return Err(ConfigError::invalid("API_V1_STR", "must start with `/`"));
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn parse_api_host(value: &str) -> ConfigResult<String> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::invalid(
            "OPENAI_API_HOST",
            "must start with http:// or https://",
        ));
    }
    Ok(value.trim_end_matches('/').to_owned())
}
