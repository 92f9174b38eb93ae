//! Shared, read-only application state.

use std::sync::Arc;

use eprompt_adapters::{CompletionClient, OpenAiConfig, ProviderRouter};
use eprompt_config::Settings;
use eprompt_engine::{PromptRunner, Refiner};
use eprompt_templates::PromptEngine;
use tracing::warn;

use crate::error::ServerResult;

/// Everything a request handler needs, shared as `Arc<AppState>`.
#[derive(Debug)]
pub struct AppState {
    settings: Settings,
    engine: Arc<PromptEngine>,
    runner: PromptRunner,
    refiner: Refiner,
}

impl AppState {
    /// Creates state around an explicit completion client.
    #[must_use]
    pub fn new(settings: Settings, client: Arc<dyn CompletionClient>) -> Self {
        let engine = Arc::new(PromptEngine::new());
        let runner = PromptRunner::with_engine(Arc::clone(&engine), client);
        let refiner = Refiner::new(runner.clone());
        Self {
            settings,
            engine,
            runner,
            refiner,
        }
    }

    /// Creates state with the provider router configured from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Adapter`](crate::ServerError::Adapter) when the
    /// `OpenAI` host is unusable.
    pub fn from_settings(settings: Settings) -> ServerResult<Self> {
        let mut openai = OpenAiConfig::new().with_base_url(&settings.openai_api_host)?;
        match settings.openai_api_key.as_deref() {
            Some(key) => openai = openai.with_api_key(key),
            None => warn!("OPENAI_API_KEY is not set; openai requests need a per-request key"),
        }
        let router = ProviderRouter::new(openai);
        Ok(Self::new(settings, Arc::new(router)))
    }

    /// Returns the loaded settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the template engine.
    #[must_use]
    pub fn engine(&self) -> &PromptEngine {
        &self.engine
    }

    /// Returns the generate-and-run pipeline.
    #[must_use]
    pub fn runner(&self) -> &PromptRunner {
        &self.runner
    }

    /// Returns the refiner.
    #[must_use]
    pub fn refiner(&self) -> &Refiner {
        &self.refiner
    }
}
