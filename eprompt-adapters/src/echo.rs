//! Placeholder client for providers without a real integration.

use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use crate::traits::{AdapterResult, Completion, CompletionClient, CompletionRequest};

/// Answers every request by tagging the prompt with the provider and model.
///
/// This is a stand-in, not a provider integration: the content is
/// `[Generated with {provider}/{model}]` followed by the prompt, and the token
/// count is estimated as a quarter of the prompt length in characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoAdapter;

impl EchoAdapter {
    /// Creates the placeholder client.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for EchoAdapter {
    async fn complete(&self, request: CompletionRequest) -> AdapterResult<Completion> {
        let started = Instant::now();
        let config = request.config();
        let content = format!(
            "[Generated with {}/{}]\n\n{}",
            config.provider,
            config.model,
            request.prompt()
        );
        let tokens_used = u32::try_from(request.prompt().chars().count() / 4).unwrap_or(u32::MAX);
        debug!(provider = %config.provider, model = %config.model, tokens = tokens_used, "placeholder completion");

        Ok(Completion {
            content,
            tokens_used,
            elapsed: started.elapsed(),
        })
    }
}
