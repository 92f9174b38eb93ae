//! Route handlers. Each takes the shared state and the raw body and returns
//! a JSON response or an [`ApiError`](crate::ApiError).

pub(crate) mod prompts;
pub(crate) mod refiner;
pub(crate) mod service;

use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Body, Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;

pub(crate) type HandlerResult = Result<Response<Body>, ApiError>;

/// Serializes `value` as a `200 OK` JSON response.
pub(crate) fn json_ok<T: Serialize>(value: &T) -> HandlerResult {
    let body = serde_json::to_vec(value)
        .map_err(|err| ApiError::internal(format!("failed to encode response: {err}")))?;
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}
