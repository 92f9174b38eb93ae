//! Request routing.

use std::sync::Arc;
use std::time::Instant;

use bytes::{Bytes, BytesMut};
use hyper::body::HttpBody;
use hyper::header::HeaderValue;
use hyper::{Body, Method, Request, Response};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{HandlerResult, prompts, refiner, service};
use crate::state::AppState;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Header echoing the identifier assigned to each request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    Welcome,
    Health,
    GeneratePrompt,
    PreviewPrompt,
    ExtractVariables,
    ValidateContext,
    GenerateAndRun,
    RefinerTools,
    Refine,
    BatchRefine,
}

impl Route {
    fn resolve(api_prefix: &str, path: &str) -> Option<Self> {
        match path {
            "/" => return Some(Self::Welcome),
            "/health" => return Some(Self::Health),
            _ => {}
        }

        let route = match path.strip_prefix(api_prefix)? {
            "/prompts/generate-prompt" => Self::GeneratePrompt,
            "/prompts/preview-prompt" => Self::PreviewPrompt,
            "/prompts/extract-variables" => Self::ExtractVariables,
            "/prompts/validate-context" => Self::ValidateContext,
            "/prompts/generate-and-run" => Self::GenerateAndRun,
            "/refiner/tools" => Self::RefinerTools,
            "/refiner/refine" => Self::Refine,
            "/refiner/batch-refine" => Self::BatchRefine,
            _ => return None,
        };
        Some(route)
    }

    fn method(self) -> Method {
        match self {
            Self::Welcome | Self::Health | Self::RefinerTools => Method::GET,
            Self::GeneratePrompt
            | Self::PreviewPrompt
            | Self::ExtractVariables
            | Self::ValidateContext
            | Self::GenerateAndRun
            | Self::Refine
            | Self::BatchRefine => Method::POST,
        }
    }
}

/// Serves one request.
///
/// Never fails: every error becomes a `{"detail": ...}` response. Each request
/// gets a fresh identifier, logged with the outcome and returned in the
/// `x-request-id` header.
pub async fn handle(state: Arc<AppState>, request: Request<Body>) -> Response<Body> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = match dispatch(&state, request).await {
        Ok(response) => response,
        Err(err) => {
            if err.status().is_server_error() {
                warn!(%request_id, status = err.status().as_u16(), detail = err.detail(), "request failed");
            }
            err.into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        %request_id,
        %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request handled"
    );
    response
}

async fn dispatch(state: &AppState, request: Request<Body>) -> HandlerResult {
    let route = Route::resolve(&state.settings().api_prefix, request.uri().path())
        .ok_or_else(ApiError::not_found)?;
    if request.method() != route.method() {
        return Err(ApiError::method_not_allowed());
    }

    match route {
        Route::Welcome => service::welcome(state),
        Route::Health => service::health(state),
        Route::RefinerTools => refiner::list_tools(),
        Route::GeneratePrompt => prompts::generate_prompt(state, &read_body(request).await?),
        Route::PreviewPrompt => prompts::preview_prompt(state, &read_body(request).await?),
        Route::ExtractVariables => prompts::extract_variables(&read_body(request).await?),
        Route::ValidateContext => prompts::validate_context(&read_body(request).await?),
        Route::GenerateAndRun => prompts::generate_and_run(state, &read_body(request).await?).await,
        Route::Refine => refiner::refine(state, &read_body(request).await?).await,
        Route::BatchRefine => refiner::batch_refine(state, &read_body(request).await?).await,
    }
}

async fn read_body(request: Request<Body>) -> Result<Bytes, ApiError> {
    let mut body = request.into_body();
    if body.size_hint().lower() > MAX_BODY_BYTES {
        return Err(ApiError::payload_too_large(MAX_BODY_BYTES));
    }

    let mut buffer = BytesMut::new();
    while let Some(chunk) = body.data().await {
        let chunk =
            chunk.map_err(|err| ApiError::bad_request(format!("failed to read request body: {err}")))?;
        if buffer.len() + chunk.len() > usize::try_from(MAX_BODY_BYTES).unwrap_or(usize::MAX) {
            return Err(ApiError::payload_too_large(MAX_BODY_BYTES));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}
