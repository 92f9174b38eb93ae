use chrono::Utc;
use eprompt_templates::{extract_template_variables, validate_required_fields};
use tracing::warn;

use crate::dto::{
    ExtractVariablesRequest, ExtractVariablesResponse, GenerateAndRunRequest,
    GeneratePromptRequest, PreviewPromptRequest, ValidateContextRequest,
    ValidateContextResponse, parse_json, validate_model_config,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::{HandlerResult, json_ok};

pub(crate) fn generate_prompt(state: &AppState, body: &[u8]) -> HandlerResult {
    let request: GeneratePromptRequest = parse_json(body)?;
    json_ok(&state.engine().generate(&request.template, &request.context))
}

pub(crate) fn preview_prompt(state: &AppState, body: &[u8]) -> HandlerResult {
    let request: PreviewPromptRequest = parse_json(body)?;
    json_ok(&state.engine().preview(&request.template, &request.context))
}

pub(crate) fn extract_variables(body: &[u8]) -> HandlerResult {
    let request: ExtractVariablesRequest = parse_json(body)?;
    if request.template.is_empty() {
        return Err(ApiError::bad_request("Template string is required"));
    }
    let variables = extract_template_variables(&request.template);
    json_ok(&ExtractVariablesResponse {
        count: variables.len(),
        variables,
        template: request.template,
        extracted_at: Utc::now(),
    })
}

pub(crate) fn validate_context(body: &[u8]) -> HandlerResult {
    let request: ValidateContextRequest = parse_json(body)?;
    let missing_fields = validate_required_fields(&request.required_fields, &request.context);
    json_ok(&ValidateContextResponse {
        is_valid: missing_fields.is_empty(),
        missing_fields,
        provided_fields: request.context.into_keys().collect(),
        required_fields: request.required_fields,
        validated_at: Utc::now(),
    })
}

pub(crate) async fn generate_and_run(state: &AppState, body: &[u8]) -> HandlerResult {
    let request: GenerateAndRunRequest = parse_json(body)?;
    validate_model_config(&request.ai_model_config)?;

    let output = state
        .runner()
        .generate_and_run(&request.template, &request.context, request.ai_model_config)
        .await
        .map_err(|err| {
            warn!(template_id = request.template.id(), %err, "generate-and-run failed");
            ApiError::from_engine("Failed to generate and run prompt", &err)
        })?;
    json_ok(&output)
}
