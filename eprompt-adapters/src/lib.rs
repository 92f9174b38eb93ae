//! Completion clients used by the prompt engine.
//!
//! Every client implements [`traits::CompletionClient`]. [`openai`] talks to
//! the `OpenAI` chat completions API, [`echo`] is the placeholder answering
//! other providers, and [`router`] picks between them per request.

#![warn(missing_docs, clippy::pedantic)]

pub mod echo;
pub mod openai;
pub mod router;
pub mod traits;

mod http_client;

pub use echo::EchoAdapter;
pub use openai::{OpenAiAdapter, OpenAiConfig};
pub use router::ProviderRouter;
pub use traits::{
    AdapterError, AdapterResult, Completion, CompletionClient, CompletionRequest, MessageRole,
    PromptMessage,
};
