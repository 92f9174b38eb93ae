//! Records returned by the generate and preview operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered prompt with the validation outcome that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    /// Final prompt text, trimmed. Empty when rendering failed.
    pub prompt: String,
    /// Required fields the context did not supply, in declaration order.
    pub missing_fields: Vec<String>,
    /// Template variables that received a non-blank value.
    pub context_used: Vec<String>,
    /// Provenance and status.
    pub metadata: PromptMetadata,
}

impl RenderedPrompt {
    /// Returns `true` when every required field was supplied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Metadata attached to a [`RenderedPrompt`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptMetadata {
    /// Identifier of the source template.
    pub template_id: String,
    /// Display name of the source template.
    pub template_name: String,
    /// When the prompt was produced.
    pub generated_at: DateTime<Utc>,
    /// `true` when no required field was missing and rendering succeeded.
    pub has_required_fields: bool,
    /// Render failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A best-effort render where gaps are shown as `[name]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviewResult {
    /// Preview text, or the render error message.
    pub preview: String,
    /// Every variable the template references.
    pub variables_found: Vec<String>,
    /// Variables the context supplied.
    pub variables_provided: Vec<String>,
    /// Variables shown as placeholders.
    pub variables_missing: Vec<String>,
    /// Provenance and status.
    pub metadata: PreviewMetadata,
}

/// Metadata attached to a [`PreviewResult`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviewMetadata {
    /// Identifier of the source template.
    pub template_id: String,
    /// Display name of the source template.
    pub template_name: String,
    /// When the preview was produced.
    pub generated_at: DateTime<Utc>,
    /// Render failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
