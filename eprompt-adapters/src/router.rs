//! Provider dispatch.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use eprompt_primitives::Provider;

use crate::echo::EchoAdapter;
use crate::openai::{OpenAiAdapter, OpenAiConfig};
use crate::traits::{AdapterResult, Completion, CompletionClient, CompletionRequest};

/// Routes each request to the client serving its provider.
///
/// `openai` requests go to the `OpenAI` client; every other provider is
/// answered by the fallback client, an [`EchoAdapter`] by default.
#[derive(Clone)]
pub struct ProviderRouter {
    openai: Arc<dyn CompletionClient>,
    fallback: Arc<dyn CompletionClient>,
}

impl fmt::Debug for ProviderRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRouter").finish_non_exhaustive()
    }
}

impl ProviderRouter {
    /// Creates a router backed by a real `OpenAI` client.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self::with_clients(Arc::new(OpenAiAdapter::new(config)), Arc::new(EchoAdapter::new()))
    }

    /// Creates a router from explicit clients.
    #[must_use]
    pub fn with_clients(
        openai: Arc<dyn CompletionClient>,
        fallback: Arc<dyn CompletionClient>,
    ) -> Self {
        Self { openai, fallback }
    }

    fn client_for(&self, provider: Provider) -> &dyn CompletionClient {
        match provider {
            Provider::OpenAi => self.openai.as_ref(),
            Provider::Anthropic | Provider::Google | Provider::Local => self.fallback.as_ref(),
        }
    }
}

#[async_trait]
impl CompletionClient for ProviderRouter {
    async fn complete(&self, request: CompletionRequest) -> AdapterResult<Completion> {
        self.client_for(request.config().provider)
            .complete(request)
            .await
    }
}
