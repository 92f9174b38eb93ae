use eprompt_adapters::AdapterError;
use thiserror::Error;

/// Result alias for pipeline and refiner operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while running or refining prompts.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The completion client failed.
    #[error("completion failed: {0}")]
    Completion(#[from] AdapterError),

    /// No refiner tool has the requested identifier.
    #[error("Refiner tool '{tool_id}' not found")]
    ToolNotFound {
        /// Identifier that was looked up.
        tool_id: String,
    },

    /// The content to refine was empty or whitespace only.
    #[error("No content provided to refine")]
    EmptyContent,

    /// A refinement run failed after the tool and content were accepted.
    #[error("Failed to refine prompt with {tool}: {source}")]
    Refinement {
        /// Display name of the tool.
        tool: String,
        /// Underlying completion failure.
        source: AdapterError,
    },
}

impl EngineError {
    /// Convenience constructor for unknown tools.
    #[must_use]
    pub fn tool_not_found(tool_id: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool_id: tool_id.into(),
        }
    }
}
