//! Prompt refinement with the built-in tools.

use std::time::Instant;

use chrono::{DateTime, Utc};
use eprompt_primitives::{Context, ContextValue, ModelConfig, Template};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{RefinerTool, find_tool};
use crate::cleanup::extract_refined_content;
use crate::error::{EngineError, EngineResult};
use crate::runner::{PromptRunner, millis};

const REFINE_TEMPERATURE: f32 = 0.3;
const REFINE_ROLE: &str = "Expert Prompt Engineer";
const REFINE_USE_CASE: &str = "Prompt Refinement";
const CONTENT_FIELD: &str = "content";

/// A prompt rewritten by one tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Refinement {
    /// Rewritten prompt with model boilerplate removed.
    pub refined_content: String,
    /// Display name of the tool.
    pub tool_used: String,
    /// Identifier of the tool.
    pub tool_id: String,
    /// Length of the input in characters.
    pub original_length: usize,
    /// Length of the output in characters.
    pub refined_length: usize,
    /// Tokens reported by the provider.
    pub tokens_used: u32,
    /// Wall-clock time for the refinement.
    pub latency_ms: u64,
    /// When the refinement finished.
    pub timestamp: DateTime<Utc>,
}

/// A tool that failed inside a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailedRefinement {
    /// Identifier that was requested.
    pub tool_id: String,
    /// Failure message.
    pub error: String,
    /// Always `None`; kept so every entry carries the key.
    pub refined_content: Option<String>,
}

/// One entry of a batch, in request order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    /// The tool succeeded.
    Refined(Refinement),
    /// The tool failed; the batch carried on.
    Failed(FailedRefinement),
}

impl BatchEntry {
    /// Returns `true` for successful entries.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Refined(_))
    }
}

/// Results of applying several tools to the same content.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchRefinement {
    /// Input shared by every tool.
    pub original_content: String,
    /// One entry per requested tool.
    pub refinements: Vec<BatchEntry>,
    /// Number of tools requested.
    pub total_tools_used: usize,
    /// Number of entries that succeeded.
    pub successful_refinements: usize,
}

/// Rewrites prompts using the catalog tools.
#[derive(Clone, Debug)]
pub struct Refiner {
    runner: PromptRunner,
}

impl Refiner {
    /// Creates a refiner that runs through `runner`.
    #[must_use]
    pub fn new(runner: PromptRunner) -> Self {
        Self { runner }
    }

    /// Rewrites `content` with the tool named `tool_id`.
    ///
    /// The sampling temperature is always 0.3, whatever `config` carries.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ToolNotFound`] for an unknown tool.
    /// - [`EngineError::EmptyContent`] for blank content.
    /// - [`EngineError::Refinement`] when the completion fails.
    pub async fn refine(
        &self,
        content: &str,
        tool_id: &str,
        config: ModelConfig,
    ) -> EngineResult<Refinement> {
        let started = Instant::now();
        let tool = find_tool(tool_id).ok_or_else(|| EngineError::tool_not_found(tool_id))?;
        if content.trim().is_empty() {
            return Err(EngineError::EmptyContent);
        }

        let template = refinement_template(tool);
        let context = Context::from([(CONTENT_FIELD.to_owned(), ContextValue::text(content))]);
        let config = config.with_temperature(REFINE_TEMPERATURE);

        let output = self
            .runner
            .generate_and_run(&template, &context, config)
            .await
            .map_err(|err| match err {
                EngineError::Completion(source) => EngineError::Refinement {
                    tool: tool.name.to_owned(),
                    source,
                },
                other => other,
            })?;

        let refined_content = extract_refined_content(&output.result);
        info!(tool_id = tool.id, tokens = output.tokens_used, "prompt refined");

        Ok(Refinement {
            original_length: content.chars().count(),
            refined_length: refined_content.chars().count(),
            refined_content,
            tool_used: tool.name.to_owned(),
            tool_id: tool.id.to_owned(),
            tokens_used: output.tokens_used,
            latency_ms: millis(started.elapsed()),
            timestamp: Utc::now(),
        })
    }

    /// Applies each tool in order. A failing tool is recorded and does not
    /// stop the batch.
    pub async fn batch_refine<S: AsRef<str>>(
        &self,
        content: &str,
        tool_ids: &[S],
        config: &ModelConfig,
    ) -> BatchRefinement {
        let mut refinements = Vec::with_capacity(tool_ids.len());
        for tool_id in tool_ids {
            let tool_id = tool_id.as_ref();
            let entry = match self.refine(content, tool_id, config.clone()).await {
                Ok(refinement) => BatchEntry::Refined(refinement),
                Err(err) => {
                    warn!(tool_id, %err, "batch refinement step failed");
                    BatchEntry::Failed(FailedRefinement {
                        tool_id: tool_id.to_owned(),
                        error: err.to_string(),
                        refined_content: None,
                    })
                }
            };
            refinements.push(entry);
        }

        BatchRefinement {
            original_content: content.to_owned(),
            total_tools_used: tool_ids.len(),
            successful_refinements: refinements.iter().filter(|entry| entry.is_success()).count(),
            refinements,
        }
    }
}

fn refinement_template(tool: &RefinerTool) -> Template {
    let body = format!(
        "{instruction}\n\nOriginal Prompt:\n\"\"\"\n{{{{content}}}}\n\"\"\"\n\n\
         Please provide only the improved prompt as your response, without any \
         explanations or additional text. Focus on making it a better prompt for \
         AI systems while maintaining the original intent.",
        instruction = tool.instruction
    );
    Template::builder(format!("refine-{}", tool.id), tool.name, body)
        .description(tool.description)
        .role(REFINE_ROLE)
        .use_case(REFINE_USE_CASE)
        .required_fields([CONTENT_FIELD])
        .build()
}
