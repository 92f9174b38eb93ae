//! Generate-and-run pipeline.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use eprompt_adapters::{CompletionClient, CompletionRequest};
use eprompt_primitives::{Context, ModelConfig, Template};
use eprompt_templates::{PromptEngine, ResponseSections, parse_response_sections};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::EngineResult;

/// Outcome of rendering a template and completing the prompt.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunOutput {
    /// Prompt sent to the model.
    pub prompt: String,
    /// Model output, or a notice listing missing required fields.
    pub result: String,
    /// `result` split at headings.
    pub sections: ResponseSections,
    /// Tokens reported by the provider.
    pub tokens_used: u32,
    /// Wall-clock time for the whole run.
    pub latency_ms: u64,
    /// Configuration the run used.
    pub ai_model_config: ModelConfig,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
}

/// Renders templates and forwards the prompts to a completion client.
#[derive(Clone)]
pub struct PromptRunner {
    engine: Arc<PromptEngine>,
    client: Arc<dyn CompletionClient>,
}

impl fmt::Debug for PromptRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRunner")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl PromptRunner {
    /// Creates a runner with its own template engine.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_engine(Arc::new(PromptEngine::new()), client)
    }

    /// Creates a runner that shares an existing template engine.
    #[must_use]
    pub fn with_engine(engine: Arc<PromptEngine>, client: Arc<dyn CompletionClient>) -> Self {
        Self { engine, client }
    }

    /// Returns the template engine.
    #[must_use]
    pub fn engine(&self) -> &PromptEngine {
        &self.engine
    }

    /// Renders `template` and, when every required field is present, asks the
    /// model to complete the prompt.
    ///
    /// Missing required fields short-circuit without a network call: the
    /// result names the missing fields and no tokens are spent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Completion`](crate::EngineError::Completion)
    /// when the completion client fails.
    pub async fn generate_and_run(
        &self,
        template: &Template,
        context: &Context,
        config: ModelConfig,
    ) -> EngineResult<RunOutput> {
        let started = Instant::now();
        let rendered = self.engine.generate(template, context);

        if !rendered.is_complete() {
            let missing = rendered.missing_fields.join(", ");
            info!(template_id = template.id(), %missing, "skipping completion; required fields missing");
            return Ok(RunOutput {
                prompt: rendered.prompt,
                result: format!("Error: Missing required fields: {missing}"),
                sections: ResponseSections::new(),
                tokens_used: 0,
                latency_ms: millis(started.elapsed()),
                ai_model_config: config,
                timestamp: Utc::now(),
            });
        }

        let request = CompletionRequest::new(
            rendered.prompt.clone(),
            template.role(),
            template.use_case(),
            config.clone(),
        );
        let completion = self.client.complete(request).await.inspect_err(|err| {
            warn!(template_id = template.id(), provider = %config.provider, %err, "completion failed");
        })?;

        debug!(
            template_id = template.id(),
            provider = %config.provider,
            model = %config.model,
            tokens = completion.tokens_used,
            "prompt completed"
        );

        Ok(RunOutput {
            prompt: rendered.prompt,
            sections: parse_response_sections(&completion.content),
            result: completion.content,
            tokens_used: completion.tokens_used,
            latency_ms: millis(started.elapsed()),
            ai_model_config: config,
            timestamp: Utc::now(),
        })
    }
}

pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
