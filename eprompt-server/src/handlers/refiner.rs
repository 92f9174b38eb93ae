use eprompt_engine::tools;

use crate::dto::{BatchRefineRequest, RefineRequest, ToolsResponse, parse_json, validate_model_config};
use crate::error::ApiError;
use crate::state::AppState;

use super::{HandlerResult, json_ok};

pub(crate) fn list_tools() -> HandlerResult {
    let tools = tools();
    json_ok(&ToolsResponse {
        tools,
        count: tools.len(),
    })
}

pub(crate) async fn refine(state: &AppState, body: &[u8]) -> HandlerResult {
    let request: RefineRequest = parse_json(body)?;
    validate_model_config(&request.ai_model_config)?;

    let refinement = state
        .refiner()
        .refine(&request.content, &request.tool_id, request.ai_model_config)
        .await
        .map_err(|err| ApiError::from_engine("Failed to refine prompt", &err))?;
    json_ok(&refinement)
}

pub(crate) async fn batch_refine(state: &AppState, body: &[u8]) -> HandlerResult {
    let request: BatchRefineRequest = parse_json(body)?;
    validate_model_config(&request.ai_model_config)?;

    let batch = state
        .refiner()
        .batch_refine(&request.content, &request.tool_ids, &request.ai_model_config)
        .await;
    json_ok(&batch)
}
