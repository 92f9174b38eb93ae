//! Request and response bodies.

use chrono::{DateTime, Utc};
use eprompt_engine::RefinerTool;
use eprompt_primitives::{Context, ModelConfig, Template};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of `generate-prompt`.
#[derive(Debug, Deserialize)]
pub struct GeneratePromptRequest {
    /// Template to render.
    pub template: Template,
    /// Values for the placeholders.
    pub context: Context,
}

/// Body of `preview-prompt`.
#[derive(Debug, Deserialize)]
pub struct PreviewPromptRequest {
    /// Template to preview.
    pub template: Template,
    /// Values for the placeholders, if any.
    #[serde(default)]
    pub context: Context,
}

/// Body of `extract-variables`.
#[derive(Debug, Deserialize)]
pub struct ExtractVariablesRequest {
    /// Raw template body.
    #[serde(default)]
    pub template: String,
}

/// Response of `extract-variables`.
#[derive(Debug, Serialize)]
pub struct ExtractVariablesResponse {
    /// Placeholder names, sorted.
    pub variables: Vec<String>,
    /// Number of names.
    pub count: usize,
    /// Template that was scanned.
    pub template: String,
    /// When the scan ran.
    pub extracted_at: DateTime<Utc>,
}

/// Body of `validate-context`.
#[derive(Debug, Deserialize)]
pub struct ValidateContextRequest {
    /// Fields that must be present.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Supplied values.
    #[serde(default)]
    pub context: Context,
}

/// Response of `validate-context`.
#[derive(Debug, Serialize)]
pub struct ValidateContextResponse {
    /// `true` when nothing is missing.
    pub is_valid: bool,
    /// Required fields that are absent or blank.
    pub missing_fields: Vec<String>,
    /// Every key in the supplied context.
    pub provided_fields: Vec<String>,
    /// Echo of the required list.
    pub required_fields: Vec<String>,
    /// When validation ran.
    pub validated_at: DateTime<Utc>,
}

/// Body of `generate-and-run`.
#[derive(Debug, Deserialize)]
pub struct GenerateAndRunRequest {
    /// Template to render.
    pub template: Template,
    /// Values for the placeholders.
    pub context: Context,
    /// Model to run the prompt against.
    #[serde(alias = "model_config")]
    pub ai_model_config: ModelConfig,
}

/// Body of `refine`.
#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    /// Prompt to rewrite.
    pub content: String,
    /// Catalog tool identifier.
    pub tool_id: String,
    /// Model to run the refinement against.
    #[serde(alias = "model_config")]
    pub ai_model_config: ModelConfig,
}

/// Body of `batch-refine`.
#[derive(Debug, Deserialize)]
pub struct BatchRefineRequest {
    /// Prompt to rewrite.
    pub content: String,
    /// Catalog tool identifiers, applied in order.
    pub tool_ids: Vec<String>,
    /// Model to run the refinements against.
    #[serde(alias = "model_config")]
    pub ai_model_config: ModelConfig,
}

/// Response of `refiner/tools`.
#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    /// Catalog entries without their instructions.
    pub tools: &'static [RefinerTool],
    /// Number of tools.
    pub count: usize,
}

/// Response of `/`.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// Greeting naming the service.
    pub message: String,
}

/// Response of `/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Service name.
    pub service: String,
}

/// Decodes a JSON body, mapping failures to `422`.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::validation(format!("invalid request body: {err}")))
}

/// Rejects model configurations with out-of-range parameters.
pub(crate) fn validate_model_config(config: &ModelConfig) -> Result<(), ApiError> {
    config
        .validate()
        .map_err(|err| ApiError::validation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_config_alias_is_accepted() {
        let json = br#"{
            "content": "x",
            "tool_id": "concise",
            "model_config": {"provider": "openai", "model": "gpt-4o"}
        }"#;
        let request: RefineRequest = parse_json(json).expect("request");
        assert_eq!(request.ai_model_config.model, "gpt-4o");
    }

    #[test]
    fn nested_context_values_are_rejected() {
        let json = br#"{
            "template": {"id": "t", "name": "T", "description": "", "template": "{{a}}",
                         "role": "", "useCase": "", "requiredFields": []},
            "context": {"a": {"nested": true}}
        }"#;
        let err = parse_json::<GeneratePromptRequest>(json).expect_err("nested object");
        assert_eq!(err.status().as_u16(), 422);
    }

    #[test]
    fn out_of_range_temperature_is_a_validation_error() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"provider": "openai", "model": "m", "temperature": 3.0}"#)
                .expect("config");
        let err = validate_model_config(&config).expect_err("range");
        assert_eq!(err.status().as_u16(), 422);
        assert!(err.detail().contains("temperature"));
    }
}
