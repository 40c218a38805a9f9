use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// A single non-streaming completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instructions. Left out of the request entirely when empty.
    pub system: String,
    /// The user turn.
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Creates a request with a system prompt and a user turn.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.6,
            max_tokens: 1000,
        }
    }

    /// Creates a request consisting of a single user turn.
    pub fn user_only(user: impl Into<String>) -> Self {
        Self::new(String::new(), user)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A text completion service.
///
/// The core treats it as opaque: a request either yields the raw model text
/// or fails. An empty answer counts as a failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// An implementation of `CompletionService` for any OpenAI-compatible API
/// (Groq, OpenAI, Gemini's compatibility endpoint).
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "llama-3.1-8b-instant").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl CompletionService for OpenAICompatibleClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);
        if !request.system.is_empty() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(request.system)
                    .build()?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user)
                .build()?
                .into(),
        );

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_completion_tokens(request.max_tokens)
            .build()?;

        let response: CreateChatCompletionResponse =
            self.client.chat().create(chat_request).await?;
        debug!(model = %self.model, choices = response.choices.len(), "Completion received");

        let text = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("Empty response from completion service");
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = CompletionRequest::new("system", "user")
            .with_temperature(0.2)
            .with_max_tokens(300);
        assert_eq!(request.system, "system");
        assert_eq!(request.user, "user");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 300);
    }

    #[test]
    fn test_user_only_request_has_no_system_prompt() {
        let request = CompletionRequest::user_only("quiz me");
        assert!(request.system.is_empty());
        assert_eq!(request.user, "quiz me");
    }
}
