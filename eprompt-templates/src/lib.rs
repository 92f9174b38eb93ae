//! Prompt templating for ePrompt.
//!
//! Templates use `{{name}}` placeholders and are rendered by `minijinja`.
//! The [`PromptEngine`] ties variable extraction, required-field validation,
//! context sanitization and rendering into the generate and preview
//! operations. [`parse_response_sections`] splits completion output into
//! named sections.

#![warn(missing_docs, clippy::pedantic)]

mod builder;
mod context;
mod engine;
mod output;
mod render;
mod sections;
mod variables;

pub use builder::create_template;
pub use context::{SanitizedContext, sanitize_context, used_context_fields, validate_required_fields};
pub use engine::PromptEngine;
pub use output::{PreviewMetadata, PreviewResult, PromptMetadata, RenderedPrompt};
pub use render::{TemplateError, TemplateResult};
pub use sections::{MAIN_SECTION, ResponseSections, parse_response_sections};
pub use variables::extract_template_variables;
