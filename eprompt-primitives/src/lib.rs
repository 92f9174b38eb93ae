//! Core shared types for the ePrompt prompt engine.

#![warn(missing_docs, clippy::pedantic)]

mod context;
mod error;
mod model;
mod template;

/// Context values supplied by callers and the map that holds them.
pub use context::{Context, ContextValue};
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Model configuration forwarded to completion providers.
pub use model::{ModelConfig, Provider};
/// Prompt template record and its builder.
pub use template::{Template, TemplateBuilder};
