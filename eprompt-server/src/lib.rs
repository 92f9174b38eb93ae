//! HTTP API for the ePrompt prompt engine.
//!
//! Routes are served by hyper behind a small hand-written router:
//!
//! | Method | Path |
//! |---|---|
//! | `GET` | `/` |
//! | `GET` | `/health` |
//! | `POST` | `{prefix}/prompts/generate-prompt` |
//! | `POST` | `{prefix}/prompts/preview-prompt` |
//! | `POST` | `{prefix}/prompts/extract-variables` |
//! | `POST` | `{prefix}/prompts/validate-context` |
//! | `POST` | `{prefix}/prompts/generate-and-run` |
//! | `GET` | `{prefix}/refiner/tools` |
//! | `POST` | `{prefix}/refiner/refine` |
//! | `POST` | `{prefix}/refiner/batch-refine` |
//!
//! Errors are answered as `{"detail": "..."}`.

#![warn(missing_docs, clippy::pedantic)]

pub mod dto;
pub mod error;
mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ServerError, ServerResult};
pub use routes::{MAX_BODY_BYTES, REQUEST_ID_HEADER, handle};
pub use server::{resolve_addr, serve, shutdown_signal};
pub use state::AppState;
