use crate::dto::{HealthResponse, WelcomeResponse};
use crate::state::AppState;

use super::{HandlerResult, json_ok};

pub(crate) fn welcome(state: &AppState) -> HandlerResult {
    json_ok(&WelcomeResponse {
        message: format!("Welcome to {}", state.settings().project_name),
    })
}

pub(crate) fn health(state: &AppState) -> HandlerResult {
    json_ok(&HealthResponse {
        status: "healthy",
        service: state.settings().project_name.clone(),
    })
}
