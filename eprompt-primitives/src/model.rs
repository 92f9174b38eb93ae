//! Model configuration supplied with completion requests.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TOP_P: f32 = 1.0;

/// Completion providers a caller may select.
///
/// Only [`Provider::OpenAi`] is backed by a real integration; the others are
/// accepted for compatibility and answered by a placeholder adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// `OpenAI` chat completions.
    #[default]
    OpenAi,
    /// Anthropic.
    Anthropic,
    /// Google.
    Google,
    /// Locally hosted model.
    Local,
}

impl Provider {
    /// Returns the wire identifier for the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Local => "local",
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" => Ok(Self::Google),
            "local" => Ok(Self::Local),
            other => Err(Error::UnknownProvider(other.to_owned())),
        }
    }
}

/// Sampling and routing parameters for a single completion call.
///
/// Optional numeric fields fall back to provider-neutral defaults through the
/// accessor methods, so `null` and an omitted key behave the same.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider that should serve the request.
    pub provider: Provider,
    /// Provider-specific model identifier.
    pub model: String,
    /// Sampling temperature, `0.0..=2.0`.
    #[serde(default = "default_temperature")]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling mass, `0.0..=1.0`.
    #[serde(default = "default_top_p")]
    pub top_p: Option<f32>,
    /// Frequency penalty, `-2.0..=2.0`.
    #[serde(default = "default_penalty")]
    pub frequency_penalty: Option<f32>,
    /// Presence penalty, `-2.0..=2.0`.
    #[serde(default = "default_penalty")]
    pub presence_penalty: Option<f32>,
    /// Overrides the provider base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_api_host: Option<String>,
    /// Overrides the server-wide API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_api_key: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_temperature() -> Option<f32> {
    Some(DEFAULT_TEMPERATURE)
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_tokens() -> Option<u32> {
    Some(DEFAULT_MAX_TOKENS)
}

#[allow(clippy::unnecessary_wraps)]
fn default_top_p() -> Option<f32> {
    Some(DEFAULT_TOP_P)
}

#[allow(clippy::unnecessary_wraps)]
fn default_penalty() -> Option<f32> {
    Some(0.0)
}

impl ModelConfig {
    /// Creates a configuration with default sampling parameters.
    #[must_use]
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: default_penalty(),
            presence_penalty: default_penalty(),
            custom_api_host: None,
            custom_api_key: None,
        }
    }

    /// Replaces the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Replaces the maximum output token budget.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Points the request at a custom API host.
    #[must_use]
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.custom_api_host = Some(host.into());
        self
    }

    /// Supplies a per-request API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.custom_api_key = Some(key.into());
        self
    }

    /// Effective sampling temperature.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Effective maximum output tokens.
    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Effective nucleus sampling mass.
    #[must_use]
    pub fn top_p(&self) -> f32 {
        self.top_p.unwrap_or(DEFAULT_TOP_P)
    }

    /// Effective frequency penalty.
    #[must_use]
    pub fn frequency_penalty(&self) -> f32 {
        self.frequency_penalty.unwrap_or_default()
    }

    /// Effective presence penalty.
    #[must_use]
    pub fn presence_penalty(&self) -> f32 {
        self.presence_penalty.unwrap_or_default()
    }

    /// Checks that every parameter lies within its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModelConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::invalid_model_config("model", "must not be empty"));
        }
        check_range("temperature", self.temperature, 0.0, 2.0)?;
        check_range("top_p", self.top_p, 0.0, 1.0)?;
        check_range("frequency_penalty", self.frequency_penalty, -2.0, 2.0)?;
        check_range("presence_penalty", self.presence_penalty, -2.0, 2.0)?;
        if self.max_tokens == Some(0) {
            return Err(Error::invalid_model_config(
                "max_tokens",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: Option<f32>, min: f32, max: f32) -> Result<()> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(Error::invalid_model_config(
            field,
            format!("{v} is outside {min}..={max}"),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_defaults_for_omitted_fields() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"provider": "openai", "model": "gpt-4o-mini"}"#)
                .expect("config");

        assert_eq!(config.provider, Provider::OpenAi);
        assert!((config.temperature() - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens(), 2000);
        assert!((config.top_p() - 1.0).abs() < f32::EPSILON);
        assert!(config.custom_api_key.is_none());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let config: ModelConfig = serde_json::from_str(
            r#"{"provider": "local", "model": "llama", "temperature": null}"#,
        )
        .expect("config");

        assert!(config.temperature.is_none());
        assert!((config.temperature() - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = serde_json::from_str::<ModelConfig>(r#"{"provider": "acme", "model": "x"}"#);
        assert!(err.is_err());
        assert!("acme".parse::<Provider>().is_err());
    }

    #[test]
    fn validates_ranges() {
        let config = ModelConfig::new(Provider::OpenAi, "gpt-4o").with_temperature(2.5);
        let err = config.validate().expect_err("temperature out of range");
        assert!(matches!(
            err,
            Error::InvalidModelConfig {
                field: "temperature",
                ..
            }
        ));

        let config = ModelConfig::new(Provider::OpenAi, "gpt-4o").with_max_tokens(0);
        assert!(config.validate().is_err());

        assert!(ModelConfig::new(Provider::Google, "gemini").validate().is_ok());
    }
}
