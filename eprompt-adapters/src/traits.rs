//! Shared completion client trait and data structures.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use eprompt_primitives::ModelConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by completion clients.
pub type AdapterResult<T> = Result<T, AdapterError>;

const DEFAULT_ROLE: &str = "assistant";
const DEFAULT_USE_CASE: &str = "general task";

/// Error type shared by completion client implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Client is misconfigured, for example with an unusable base URL.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// No API key was supplied, or only a placeholder one.
    #[error("API key not configured")]
    MissingApiKey,

    /// The request could not be encoded for the provider.
    #[error("invalid completion request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (connect, TLS, I/O).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider did not answer within the configured timeout.
    #[error("completion request timed out after {after:?}")]
    TimedOut {
        /// Timeout that elapsed.
        after: Duration,
    },

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The provider answered without any choices.
    #[error("provider returned no completion choices")]
    EmptyResponse,

    /// The provider returned a body that could not be decoded.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for undecodable responses.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Roles supported in chat-style prompts.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System messages steer the assistant behaviour.
    System,
    /// User-authored content.
    User,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
        })
    }
}

/// Represents a message in a chat-style prompt.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PromptMessage {
    role: MessageRole,
    content: String,
}

impl PromptMessage {
    /// Creates a new prompt message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A rendered prompt to be completed, with the labels that frame it.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    prompt: String,
    role: String,
    use_case: String,
    config: ModelConfig,
}

impl CompletionRequest {
    /// Creates a request.
    ///
    /// Empty labels fall back to `assistant` and `general task`.
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        role: impl Into<String>,
        use_case: impl Into<String>,
        config: ModelConfig,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            role: role.into(),
            use_case: use_case.into(),
            config,
        }
    }

    /// Returns the prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns the effective role label.
    #[must_use]
    pub fn role(&self) -> &str {
        non_empty_or(&self.role, DEFAULT_ROLE)
    }

    /// Returns the effective use-case label.
    #[must_use]
    pub fn use_case(&self) -> &str {
        non_empty_or(&self.use_case, DEFAULT_USE_CASE)
    }

    /// Returns the model configuration.
    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Builds the system instruction sent ahead of the prompt.
    #[must_use]
    pub fn system_instruction(&self) -> String {
        format!(
            "You are an expert {} helping with {}. Provide a comprehensive, \
             well-structured response that directly addresses the user's request. \
             Format your response clearly with appropriate headings and bullet \
             points where helpful.",
            self.role(),
            self.use_case()
        )
    }

    /// Returns the system and user messages for chat-style providers.
    #[must_use]
    pub fn messages(&self) -> Vec<PromptMessage> {
        vec![
            PromptMessage::new(MessageRole::System, self.system_instruction()),
            PromptMessage::new(MessageRole::User, self.prompt.clone()),
        ]
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Text produced by a completion client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Generated text.
    pub content: String,
    /// Tokens billed for the call, `0` when the provider does not report usage.
    pub tokens_used: u32,
    /// Wall-clock duration of the call.
    pub elapsed: Duration,
}

/// Trait implemented by all completion clients.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Completes the request, returning the generated text.
    async fn complete(&self, request: CompletionRequest) -> AdapterResult<Completion>;
}

#[cfg(test)]
mod tests {
    use eprompt_primitives::Provider;

    use super::*;

    fn request(role: &str, use_case: &str) -> CompletionRequest {
        CompletionRequest::new(
            "Summarise this",
            role,
            use_case,
            ModelConfig::new(Provider::OpenAi, "gpt-4o-mini"),
        )
    }

    #[test]
    fn system_instruction_uses_labels() {
        let instruction = request("Product Manager", "User Stories").system_instruction();
        assert!(instruction.starts_with(
            "You are an expert Product Manager helping with User Stories. Provide a comprehensive,"
        ));
        assert!(instruction.ends_with("bullet points where helpful."));
    }

    #[test]
    fn blank_labels_fall_back() {
        let request = request("", "  ");
        assert_eq!(request.role(), "assistant");
        assert_eq!(request.use_case(), "general task");
        assert!(
            request
                .system_instruction()
                .starts_with("You are an expert assistant helping with general task.")
        );
    }

    #[test]
    fn messages_put_system_first() {
        let messages = request("r", "u").messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), MessageRole::System);
        assert_eq!(messages[1].role(), MessageRole::User);
        assert_eq!(messages[1].content(), "Summarise this");
    }

    #[test]
    fn roles_use_chat_wire_names() {
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(
            serde_json::to_string(&MessageRole::User).expect("serialize"),
            "\"user\""
        );
    }
}
