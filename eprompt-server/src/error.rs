//! API and process error types.

use std::io;

use eprompt_adapters::AdapterError;
use eprompt_engine::EngineError;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Body, Response, StatusCode};
use serde_json::json;
use thiserror::Error;

/// Result alias for server start-up.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The completion client could not be configured.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// The bind address could not be resolved.
    #[error("cannot resolve {address}: {source}")]
    Resolve {
        /// Address as configured.
        address: String,
        /// Resolver error.
        source: io::Error,
    },

    /// The listener could not be bound.
    #[error("cannot bind {address}: {source}")]
    Bind {
        /// Address as configured.
        address: String,
        /// Underlying error.
        source: hyper::Error,
    },

    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[source] hyper::Error),
}

/// Error answered to an HTTP caller as `{"detail": ...}`.
#[derive(Debug, Error)]
#[error("{status}: {detail}")]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Builds an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// `422`: malformed body or out-of-range parameters.
    #[must_use]
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    /// `400`: a well-formed request with unusable content.
    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// `413`: the body exceeds `limit` bytes.
    #[must_use]
    pub fn payload_too_large(limit: u64) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("request body exceeds {limit} bytes"),
        )
    }

    /// `404`: no such route.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    /// `405`: the route exists but not for this method.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    /// `500`: anything unexpected.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// Maps an engine failure, prefixing the detail with `action`.
    ///
    /// Unknown tools answer `404`, blank content `400`, and completion
    /// failures `502`.
    #[must_use]
    pub fn from_engine(action: &str, err: &EngineError) -> Self {
        let status = match err {
            EngineError::ToolNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::EmptyContent => StatusCode::BAD_REQUEST,
            EngineError::Completion(_) | EngineError::Refinement { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, format!("{action}: {err}"))
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the human-readable detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Renders the error envelope.
    #[must_use]
    pub fn into_response(self) -> Response<Body> {
        let body = json!({ "detail": self.detail }).to_string();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
